//! Tree queries: by attribute, by tag; generic predicate matching.

use super::node::{NodeData, NodeId};
use super::tree::Dom;

impl Dom {
    /// Find the first node carrying `attr` with exactly `value`.
    ///
    /// Iterates all nodes in the arena (not just the tree rooted at `root`).
    pub fn query_by_attr(&self, attr: &str, value: &str) -> Option<NodeId> {
        self.iter_nodes()
            .find(|(_, data)| data.attr(attr) == Some(value))
            .map(|(node_id, _)| node_id)
    }

    /// Find all element nodes with the given tag name.
    pub fn query_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.iter_nodes()
            .filter(|(_, data)| data.tag() == Some(tag))
            .map(|(node_id, _)| node_id)
            .collect()
    }

    /// Find all nodes matching an arbitrary predicate.
    pub fn query_all(&self, predicate: impl Fn(&NodeData) -> bool) -> Vec<NodeId> {
        self.iter_nodes()
            .filter(|(_, data)| predicate(data))
            .map(|(node_id, _)| node_id)
            .collect()
    }

    /// Iterate over all `(NodeId, &NodeData)` pairs in the arena.
    ///
    /// Slotmap insertion order: deterministic but not tree-order.
    fn iter_nodes(&self) -> impl Iterator<Item = (NodeId, &NodeData)> {
        self.nodes.iter()
    }
}

#[cfg(test)]
mod tests {
    use crate::dom::node::NodeData;
    use crate::dom::tree::Dom;

    /// `<div><button id="inc">+</button><span class="count"/></div>`
    fn build_tree() -> Dom {
        let mut dom = Dom::new();
        let root = dom.insert(NodeData::element("div"));
        let button = dom.insert_child(root, NodeData::element("button").with_attr("id", "inc"));
        dom.insert_child(button, NodeData::text("+"));
        dom.insert_child(root, NodeData::element("span").with_attr("class", "count"));
        dom
    }

    #[test]
    fn query_by_attr_finds_match() {
        let dom = build_tree();
        let id = dom.query_by_attr("id", "inc").unwrap();
        assert_eq!(dom.get(id).unwrap().tag(), Some("button"));
    }

    #[test]
    fn query_by_attr_requires_exact_value() {
        let dom = build_tree();
        assert!(dom.query_by_attr("id", "dec").is_none());
        assert!(dom.query_by_attr("missing", "inc").is_none());
    }

    #[test]
    fn query_by_tag() {
        let dom = build_tree();
        assert_eq!(dom.query_by_tag("span").len(), 1);
        assert_eq!(dom.query_by_tag("li").len(), 0);
    }

    #[test]
    fn query_all_with_predicate() {
        let dom = build_tree();
        let texts = dom.query_all(|data| !data.is_element());
        assert_eq!(texts.len(), 1);
    }
}
