//! Text interpolation: `{{…}}` placeholders in a text node.

use tracing::trace;

use crate::dom::NodeId;
use crate::error::{Error, Result};
use crate::scope::Scope;

use super::BindContext;

/// A text node whose content interpolates one or more placeholders.
///
/// Holds the original source (captured at discovery) and the distinct
/// placeholder spellings in first-appearance order. Substitution is textual,
/// keyed by exact spelling: `{{ a }}` and `{{a}}` are different placeholders
/// even though they evaluate identically.
pub struct TextBinding {
    node: NodeId,
    source: String,
    placeholders: Vec<String>,
    scope: Scope,
}

impl TextBinding {
    /// Bind `node`, whose cached source contains `placeholders`.
    pub fn new(node: NodeId, source: String, placeholders: Vec<String>, scope: Scope) -> Self {
        Self {
            node,
            source,
            placeholders,
            scope,
        }
    }

    /// The node this binding owns.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Evaluate every placeholder and rewrite the node's text.
    ///
    /// Evaluation happens before the tree is borrowed, so an expression that
    /// re-enters the engine cannot conflict with this binding's write.
    pub fn update(&self, ctx: &BindContext) -> Result<()> {
        let mut text = self.source.clone();
        for raw in &self.placeholders {
            let value = ctx.eval(raw.trim(), &self.scope)?;
            text = text.replace(&format!("{{{{{raw}}}}}"), &value.to_string());
        }
        trace!(node = ?self.node, "text binding updated");
        let mut dom = ctx.dom.borrow_mut();
        let data = dom.get_mut(self.node).ok_or_else(|| {
            Error::expression(&self.source, "text binding points at a removed node")
        })?;
        data.set_text(text);
        Ok(())
    }
}

/// Extract distinct placeholder spellings from `text`, in first-appearance
/// order.
///
/// A placeholder is `{{` + spelling + `}}` where the spelling is non-empty
/// and restricted to identifier characters, dots, the operators `+ - * /`,
/// and whitespace. Anything else between braces is left alone.
pub fn find_placeholders(text: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find("{{") {
        let after = &rest[open + 2..];
        let Some(close) = after.find("}}") else {
            break;
        };
        let raw = &after[..close];
        if is_placeholder_expr(raw) && !found.iter().any(|f| f == raw) {
            found.push(raw.to_owned());
        }
        rest = &after[close + 2..];
    }
    found
}

fn is_placeholder_expr(raw: &str) -> bool {
    !raw.trim().is_empty()
        && raw.chars().all(|c| {
            c.is_ascii_alphanumeric()
                || c.is_whitespace()
                || matches!(c, '_' | '.' | '+' | '-' | '*' | '/')
        })
}
