//! Minimal markup parser: element/attribute/text source → view tree.
//!
//! Enough of an HTML-ish grammar for binding templates: nested elements,
//! double- or single-quoted attributes, valueless attributes, self-closing
//! tags, `<!-- -->` comments (skipped), and text nodes. No entities, no
//! doctype, no implicit tag closing — close what you open.
//!
//! Whitespace-only text between tags is dropped; other text is kept
//! verbatim, so placeholder spellings survive exactly as written.

use crate::dom::{Dom, NodeData, NodeId};
use crate::error::{Error, Result};

/// Parse markup into a new tree.
///
/// The source must contain exactly one top-level element, which becomes the
/// tree root.
pub fn parse(src: &str) -> Result<Dom> {
    let mut dom = Dom::new();
    let mut parser = Parser { src: src.as_bytes(), pos: 0 };
    let roots = parser.nodes(&mut dom, None)?;
    parser.skip_whitespace();
    if !parser.at_end() {
        return Err(parser.err("unexpected content after the root element"));
    }
    match roots.as_slice() {
        [single] if dom.get(*single).is_some_and(NodeData::is_element) => {
            dom.set_root(*single);
            Ok(dom)
        }
        [] => Err(Error::Markup {
            offset: src.len(),
            message: "no root element".into(),
        }),
        _ => Err(Error::Markup {
            offset: 0,
            message: "markup must have exactly one root element".into(),
        }),
    }
}

struct Parser<'a> {
    src: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn err(&self, message: impl Into<String>) -> Error {
        Error::Markup {
            offset: self.pos,
            message: message.into(),
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn starts_with(&self, prefix: &str) -> bool {
        self.src[self.pos..].starts_with(prefix.as_bytes())
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    /// Parse a sibling sequence until end of input or a closing tag.
    fn nodes(&mut self, dom: &mut Dom, parent: Option<NodeId>) -> Result<Vec<NodeId>> {
        let mut out = Vec::new();
        loop {
            if self.at_end() || self.starts_with("</") {
                return Ok(out);
            }
            if self.starts_with("<!--") {
                self.comment()?;
                continue;
            }
            if self.peek() == Some(b'<') {
                out.push(self.element(dom, parent)?);
            } else if let Some(id) = self.text(dom, parent) {
                out.push(id);
            }
        }
    }

    fn comment(&mut self) -> Result<()> {
        self.pos += 4; // <!--
        while !self.at_end() {
            if self.starts_with("-->") {
                self.pos += 3;
                return Ok(());
            }
            self.pos += 1;
        }
        Err(self.err("unterminated comment"))
    }

    /// Raw text until the next `<`. Whitespace-only runs produce no node.
    fn text(&mut self, dom: &mut Dom, parent: Option<NodeId>) -> Option<NodeId> {
        let start = self.pos;
        while self.peek().is_some_and(|b| b != b'<') {
            self.pos += 1;
        }
        let raw = std::str::from_utf8(&self.src[start..self.pos]).ok()?;
        if raw.trim().is_empty() {
            return None;
        }
        let data = NodeData::text(raw);
        Some(match parent {
            Some(parent) => dom.insert_child(parent, data),
            None => dom.insert(data),
        })
    }

    fn element(&mut self, dom: &mut Dom, parent: Option<NodeId>) -> Result<NodeId> {
        self.pos += 1; // <
        let tag = self.name("tag name")?;
        let mut data = NodeData::element(&tag);

        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(b'>') => {
                    self.pos += 1;
                    break;
                }
                Some(b'/') => {
                    self.pos += 1;
                    if self.peek() != Some(b'>') {
                        return Err(self.err("expected `>` after `/`"));
                    }
                    self.pos += 1;
                    // Self-closing: no children, no closing tag.
                    return Ok(match parent {
                        Some(parent) => dom.insert_child(parent, data),
                        None => dom.insert(data),
                    });
                }
                Some(_) => {
                    let (name, value) = self.attribute()?;
                    data = data.with_attr(name, value);
                }
                None => return Err(self.err(format!("unterminated `<{tag}>` tag"))),
            }
        }

        let id = match parent {
            Some(parent) => dom.insert_child(parent, data),
            None => dom.insert(data),
        };
        self.nodes(dom, Some(id))?;

        if !self.starts_with("</") {
            return Err(self.err(format!("missing closing tag for `<{tag}>`")));
        }
        self.pos += 2;
        let closing = self.name("closing tag name")?;
        if closing != tag {
            return Err(self.err(format!("expected `</{tag}>`, found `</{closing}>`")));
        }
        self.skip_whitespace();
        if self.peek() != Some(b'>') {
            return Err(self.err("expected `>` in closing tag"));
        }
        self.pos += 1;
        Ok(id)
    }

    /// Tag or attribute name: letters, digits, `-`, `_`, `:`.
    fn name(&mut self, what: &str) -> Result<String> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':')
        {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.err(format!("expected {what}")));
        }
        Ok(String::from_utf8_lossy(&self.src[start..self.pos]).into_owned())
    }

    fn attribute(&mut self) -> Result<(String, String)> {
        let name = self.name("attribute name")?;
        self.skip_whitespace();
        if self.peek() != Some(b'=') {
            // Valueless attribute.
            return Ok((name, String::new()));
        }
        self.pos += 1;
        self.skip_whitespace();
        let quote = match self.peek() {
            Some(q @ (b'"' | b'\'')) => q,
            _ => return Err(self.err(format!("expected quoted value for `{name}`"))),
        };
        self.pos += 1;
        let start = self.pos;
        while self.peek().is_some_and(|b| b != quote) {
            self.pos += 1;
        }
        if self.at_end() {
            return Err(self.err(format!("unterminated value for `{name}`")));
        }
        let value = String::from_utf8_lossy(&self.src[start..self.pos]).into_owned();
        self.pos += 1;
        Ok((name, value))
    }
}
