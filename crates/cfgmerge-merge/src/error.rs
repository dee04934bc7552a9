//! Error types for the merge engine.

use cfgmerge_tree::TreeError;

/// Errors that can occur during a merge.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// The merge base was absent or null; there is nothing to merge onto.
    #[error("invalid argument: merge target must not be absent or null")]
    MissingTarget,

    /// A tree operation failed (unknown node, or an acyclic rendering of a
    /// cyclic result was requested).
    #[error("tree error: {0}")]
    Tree(#[from] TreeError),
}

/// Convenience alias for merge results.
pub type MergeResult<T> = Result<T, MergeError>;
