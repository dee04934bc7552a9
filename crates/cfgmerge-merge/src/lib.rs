//! Deep merge engine for cfgmerge.
//!
//! Combines any number of source trees into one freshly allocated result.
//! Mappings merge key by key, sequences and scalars are replaced, and the
//! rightmost source wins at every conflicting leaf. Traversal runs on an
//! explicit work stack, and a per-call identity map keeps shared source nodes
//! shared in the output and stops self-referential sources from looping.
//!
//! # Key Types
//!
//! - [`merge`] / [`merge_with_stats`] -- Merge sources inside a [`Forest`](cfgmerge_tree::Forest)
//! - [`merge_json`] -- Convenience wrapper over plain `serde_json` trees
//! - [`Disposition`] -- Overwrite policy decision for one destination slot
//! - [`MergeStats`] -- Counters describing one merge invocation

pub mod engine;
pub mod error;
pub mod policy;

pub use engine::{merge, merge_json, merge_with_stats, MergeStats};
pub use error::{MergeError, MergeResult};
pub use policy::{disposition, Disposition};
