//! Node types: NodeId, NodeData, ElementData.

use std::collections::BTreeMap;

use slotmap::new_key_type;

new_key_type! {
    /// Unique identifier for a view-tree node. Copy, lightweight (u64).
    pub struct NodeId;
}

/// Data for an element node: tag name plus attributes.
///
/// Attributes are kept sorted (BTreeMap) so serialization is deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementData {
    /// Tag name (e.g. "div", "li").
    pub tag: String,
    /// Attribute name → value.
    pub attrs: BTreeMap<String, String>,
}

/// Data associated with a single view-tree node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    /// An element with a tag and attributes.
    Element(ElementData),
    /// A text node.
    Text(String),
}

impl NodeData {
    /// Create an element node with no attributes.
    pub fn element(tag: impl Into<String>) -> Self {
        NodeData::Element(ElementData {
            tag: tag.into(),
            attrs: BTreeMap::new(),
        })
    }

    /// Create a text node.
    pub fn text(content: impl Into<String>) -> Self {
        NodeData::Text(content.into())
    }

    /// Add an attribute (builder). No-op on text nodes.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let NodeData::Element(element) = &mut self {
            element.attrs.insert(name.into(), value.into());
        }
        self
    }

    /// Whether this node is an element.
    pub fn is_element(&self) -> bool {
        matches!(self, NodeData::Element(_))
    }

    /// The tag name, for element nodes.
    pub fn tag(&self) -> Option<&str> {
        match self {
            NodeData::Element(element) => Some(&element.tag),
            NodeData::Text(_) => None,
        }
    }

    /// Read an attribute value, for element nodes.
    pub fn attr(&self, name: &str) -> Option<&str> {
        match self {
            NodeData::Element(element) => element.attrs.get(name).map(String::as_str),
            NodeData::Text(_) => None,
        }
    }

    /// Remove and return an attribute. The scanner uses this to consume
    /// marker attributes.
    pub fn take_attr(&mut self, name: &str) -> Option<String> {
        match self {
            NodeData::Element(element) => element.attrs.remove(name),
            NodeData::Text(_) => None,
        }
    }

    /// The content, for text nodes.
    pub fn text_content(&self) -> Option<&str> {
        match self {
            NodeData::Text(content) => Some(content),
            NodeData::Element(_) => None,
        }
    }

    /// Replace the content of a text node. No-op on elements.
    pub fn set_text(&mut self, content: impl Into<String>) {
        if let NodeData::Text(existing) = self {
            *existing = content.into();
        }
    }
}
