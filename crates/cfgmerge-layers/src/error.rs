//! Error types for layer aggregation.

use cfgmerge_merge::MergeError;

/// Errors that can occur while aggregating layers.
#[derive(Debug, thiserror::Error)]
pub enum LayerError {
    /// The call contract was violated (e.g. a non-array where a list of
    /// groups or payloads was expected).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A payload carried JSON text that does not parse.
    #[error("payload {index} could not be merged: {source}")]
    Parse {
        /// Position of the payload in the input list.
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    /// A payload has the wrong shape to be normalized into a tree.
    #[error("payload {index} could not be merged: {reason}")]
    MalformedPayload {
        /// Position of the payload in the input list.
        index: usize,
        reason: String,
    },

    /// The deep merge itself failed.
    #[error("merge failed: {0}")]
    Merge(#[from] MergeError),
}

/// Convenience alias for layer results.
pub type LayerResult<T> = Result<T, LayerError>;
