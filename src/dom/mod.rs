//! View tree: a slotmap-backed arena of element and text nodes.

pub mod fragment;
pub mod node;
pub mod query;
pub mod tree;

pub use fragment::{Fragment, FragmentNode};
pub use node::{ElementData, NodeData, NodeId};
pub use tree::Dom;
