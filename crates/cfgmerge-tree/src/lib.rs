//! Tree model for cfgmerge.
//!
//! Configuration sources are JSON-compatible trees, but unlike
//! [`serde_json::Value`] they may share substructure or refer back to
//! themselves. This crate stores every structured node in a [`Forest`] arena
//! and addresses it by [`NodeId`], so identity, sharing, and cycles are all
//! expressible without reference counting.
//!
//! # Key Types
//!
//! - [`Forest`] -- Arena owning every sequence and mapping node
//! - [`NodeId`] -- Identity of a structured node inside a forest
//! - [`Value`] -- A slot value: either a [`Scalar`] or a reference to a node
//! - [`Node`] / [`Shape`] -- Closed variant over sequence and mapping nodes
//! - [`Key`] -- Attachment position inside a node (index or name)

pub mod error;
pub mod forest;
pub mod json;
pub mod node;

pub use error::{TreeError, TreeResult};
pub use forest::Forest;
pub use node::{Key, Node, NodeId, Scalar, Shape, Value};
