//! Error types for the tree crate.

use crate::node::{Key, NodeId};

/// Errors that can occur while building or reading a forest.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// A node id does not belong to this forest.
    #[error("node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// A key was installed into a node that cannot hold it
    /// (a non-index name on a sequence).
    #[error("key {key} cannot be installed into {node:?}")]
    KeyShapeMismatch {
        /// The destination node.
        node: NodeId,
        /// The offending key.
        key: Key,
    },

    /// The tree is self-referential and cannot be rendered as plain JSON.
    #[error("cycle detected through node {0:?}")]
    Cycle(NodeId),
}

/// Convenience alias for tree results.
pub type TreeResult<T> = Result<T, TreeError>;
