//! Change notifications published by the tree model.

use super::node::{Node, NodeId, NodeMetadata};

/// One structural or metadata change to the tree.
///
/// Structural events carry the parent and index needed to patch a view
/// incrementally. `Reloaded` is sent when that is not possible and the
/// consumer should refresh the children of `parent_id` (the root list when
/// `None`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeChangeEvent {
    /// A node was appended to its parent's children.
    Added {
        node: Node,
        parent_id: Option<NodeId>,
    },
    Removed {
        node_id: NodeId,
        parent_id: Option<NodeId>,
        from_index: usize,
    },
    Moved {
        node_id: NodeId,
        from_parent_id: Option<NodeId>,
        to_parent_id: Option<NodeId>,
        from_index: usize,
        to_index: usize,
    },
    Renamed {
        node_id: NodeId,
        old_name: String,
        new_name: String,
    },
    MetadataUpdated {
        node_id: NodeId,
        metadata: NodeMetadata,
    },
    Reloaded {
        parent_id: Option<NodeId>,
    },
}
