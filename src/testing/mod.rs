//! Test support: render a view tree back to markup for assertions.

use std::fmt::Write;

use crate::dom::{Dom, NodeData, NodeId};

/// Serialize the subtree at `id` to compact markup.
///
/// Attributes appear in name order (they are stored sorted), text nodes are
/// emitted verbatim, and empty elements render as `<tag></tag>` so output
/// round-trips through the parser. Useful with `pretty_assertions` and insta
/// snapshots.
pub fn render_to_string(dom: &Dom, id: NodeId) -> String {
    let mut out = String::new();
    write_node(dom, id, &mut out);
    out
}

fn write_node(dom: &Dom, id: NodeId, out: &mut String) {
    let Some(data) = dom.get(id) else {
        return;
    };
    match data {
        NodeData::Text(text) => out.push_str(text),
        NodeData::Element(element) => {
            let _ = write!(out, "<{}", element.tag);
            for (name, value) in &element.attrs {
                if value.is_empty() {
                    let _ = write!(out, " {name}");
                } else {
                    let _ = write!(out, " {name}=\"{value}\"");
                }
            }
            out.push('>');
            for &child in dom.children(id) {
                write_node(dom, child, out);
            }
            let _ = write!(out, "</{}>", element.tag);
        }
    }
}
