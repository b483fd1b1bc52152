//! Tree operations: insert, remove, clear regions, walk.

use std::collections::VecDeque;

use slotmap::{SecondaryMap, SlotMap};

use super::node::{NodeData, NodeId};

/// Empty slice constant for returning when a node has no children.
const EMPTY_CHILDREN: &[NodeId] = &[];

/// The central view tree, backed by a slotmap arena.
///
/// All nodes live in a single `SlotMap`. Parent/child relationships are stored
/// in secondary maps so that node removal is O(subtree size) and lookup is O(1).
#[derive(Debug)]
pub struct Dom {
    pub(crate) nodes: SlotMap<NodeId, NodeData>,
    children: SecondaryMap<NodeId, Vec<NodeId>>,
    parent: SecondaryMap<NodeId, NodeId>,
    root: Option<NodeId>,
}

impl Dom {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            children: SecondaryMap::new(),
            parent: SecondaryMap::new(),
            root: None,
        }
    }

    /// Insert a root-level node (no parent).
    ///
    /// If no root has been set yet, this node becomes the root.
    pub fn insert(&mut self, data: NodeData) -> NodeId {
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        if self.root.is_none() {
            self.root = Some(id);
        }
        id
    }

    /// Insert a node as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics (debug) if `parent` does not exist in the tree.
    pub fn insert_child(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        debug_assert!(
            self.nodes.contains_key(parent),
            "parent node does not exist"
        );
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        self.parent.insert(id, parent);
        self.children
            .get_mut(parent)
            .expect("parent must have children vec")
            .push(id);
        id
    }

    /// Remove a node and all its descendants recursively.
    ///
    /// Returns every removed id (the node itself first, descendants in BFS
    /// order), or an empty vec if the node did not exist. Callers use the
    /// list to drop per-node state such as click-action bindings.
    pub fn remove(&mut self, id: NodeId) -> Vec<NodeId> {
        if !self.nodes.contains_key(id) {
            return Vec::new();
        }

        // Detach from parent's children list.
        if let Some(parent_id) = self.parent.remove(id) {
            if let Some(siblings) = self.children.get_mut(parent_id) {
                siblings.retain(|&child| child != id);
            }
        }

        // Clear root if we're removing it.
        if self.root == Some(id) {
            self.root = None;
        }

        // Collect the whole subtree (BFS) and remove it.
        let mut queue = VecDeque::new();
        queue.push_back(id);
        let mut removed = Vec::new();

        while let Some(current) = queue.pop_front() {
            // Queue children before removing.
            if let Some(kids) = self.children.remove(current) {
                for &child in &kids {
                    queue.push_back(child);
                }
            }
            self.parent.remove(current);
            if self.nodes.remove(current).is_some() {
                removed.push(current);
            }
        }

        removed
    }

    /// Remove every child subtree of `id`, leaving the node itself in place.
    ///
    /// This is how a Repeat/Conditional binding clears its owned region
    /// before rebuilding it. Returns every removed id.
    pub fn clear_children(&mut self, id: NodeId) -> Vec<NodeId> {
        let kids: Vec<NodeId> = self.children(id).to_vec();
        let mut removed = Vec::new();
        for child in kids {
            removed.extend(self.remove(child));
        }
        removed
    }

    /// Get the parent of a node, if it has one.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parent.get(id).copied()
    }

    /// Get the children of a node. Returns an empty slice if the node has no
    /// children or does not exist.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.children
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN)
    }

    /// Immutable access to a node's data.
    pub fn get(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id)
    }

    /// Mutable access to a node's data.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(id)
    }

    /// The current root node, if set.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Explicitly set the root node.
    pub fn set_root(&mut self, id: NodeId) {
        self.root = Some(id);
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether the tree contains a node with the given id.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Pre-order depth-first traversal starting from `start`.
    ///
    /// Document order: this is the order the scanner discovers bindings in.
    pub fn walk_depth_first(&self, start: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            // Push children in reverse so the first child is visited first.
            let kids = self.children(current);
            for &child in kids.iter().rev() {
                stack.push(child);
            }
        }
        result
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}
