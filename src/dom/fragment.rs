//! Detached template fragments: snapshot a region, instantiate clones.
//!
//! A Repeat or Conditional binding captures its carrier's original child
//! markup once, at discovery time, as a [`Fragment`] — a detached recursive
//! copy with marker attributes intact. Every `update()` then stamps fresh
//! clones of that fragment back into the arena. The fragment itself is never
//! mutated after capture.

use super::node::{NodeData, NodeId};
use super::tree::Dom;

/// One detached node with its subtree.
#[derive(Debug, Clone, PartialEq)]
pub struct FragmentNode {
    pub data: NodeData,
    pub children: Vec<FragmentNode>,
}

/// An ordered sequence of detached subtrees (a region's original content).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Fragment {
    pub roots: Vec<FragmentNode>,
}

impl Fragment {
    /// Whether the fragment holds no nodes at all.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

impl Dom {
    /// Deep-copy the children of `id` into a detached [`Fragment`].
    ///
    /// The live tree is not modified.
    pub fn snapshot_children(&self, id: NodeId) -> Fragment {
        Fragment {
            roots: self
                .children(id)
                .iter()
                .map(|&child| self.snapshot_node(child))
                .collect(),
        }
    }

    fn snapshot_node(&self, id: NodeId) -> FragmentNode {
        FragmentNode {
            data: self.get(id).cloned().unwrap_or(NodeData::Text(String::new())),
            children: self
                .children(id)
                .iter()
                .map(|&child| self.snapshot_node(child))
                .collect(),
        }
    }

    /// Clone `fragment` into the arena as new children of `parent`,
    /// appended after any existing children.
    ///
    /// Returns the ids of the new top-level nodes, in order.
    pub fn instantiate(&mut self, fragment: &Fragment, parent: NodeId) -> Vec<NodeId> {
        fragment
            .roots
            .iter()
            .map(|root| self.instantiate_node(root, parent))
            .collect()
    }

    fn instantiate_node(&mut self, node: &FragmentNode, parent: NodeId) -> NodeId {
        let id = self.insert_child(parent, node.data.clone());
        for child in &node.children {
            self.instantiate_node(child, id);
        }
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `<ul><li>{{it}}</li><li id="last">x</li></ul>`
    fn list_tree() -> (Dom, NodeId) {
        let mut dom = Dom::new();
        let ul = dom.insert(NodeData::element("ul"));
        let li1 = dom.insert_child(ul, NodeData::element("li"));
        dom.insert_child(li1, NodeData::text("{{it}}"));
        let li2 = dom.insert_child(ul, NodeData::element("li").with_attr("id", "last"));
        dom.insert_child(li2, NodeData::text("x"));
        (dom, ul)
    }

    #[test]
    fn snapshot_copies_structure() {
        let (dom, ul) = list_tree();
        let fragment = dom.snapshot_children(ul);
        assert_eq!(fragment.roots.len(), 2);
        assert_eq!(fragment.roots[0].data.tag(), Some("li"));
        assert_eq!(
            fragment.roots[0].children[0].data.text_content(),
            Some("{{it}}")
        );
        assert_eq!(fragment.roots[1].data.attr("id"), Some("last"));
    }

    #[test]
    fn snapshot_leaves_tree_untouched() {
        let (dom, ul) = list_tree();
        let before = dom.len();
        let _ = dom.snapshot_children(ul);
        assert_eq!(dom.len(), before);
        assert_eq!(dom.children(ul).len(), 2);
    }

    #[test]
    fn snapshot_of_leaf_is_empty() {
        let mut dom = Dom::new();
        let p = dom.insert(NodeData::element("p"));
        assert!(dom.snapshot_children(p).is_empty());
    }

    #[test]
    fn instantiate_appends_clones() {
        let (mut dom, ul) = list_tree();
        let fragment = dom.snapshot_children(ul);
        dom.clear_children(ul);

        let first = dom.instantiate(&fragment, ul);
        let second = dom.instantiate(&fragment, ul);
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 2);
        assert_eq!(dom.children(ul).len(), 4);

        // Clones are fresh nodes, not re-attachments.
        assert_ne!(first[0], second[0]);
        let text = dom.children(first[0])[0];
        assert_eq!(dom.get(text).unwrap().text_content(), Some("{{it}}"));
    }

    #[test]
    fn instantiated_clone_is_independent() {
        let (mut dom, ul) = list_tree();
        let fragment = dom.snapshot_children(ul);
        dom.clear_children(ul);

        let ids = dom.instantiate(&fragment, ul);
        let text = dom.children(ids[0])[0];
        dom.get_mut(text).unwrap().set_text("mutated");

        // The cached fragment still holds the original source.
        assert_eq!(
            fragment.roots[0].children[0].data.text_content(),
            Some("{{it}}")
        );
    }
}
