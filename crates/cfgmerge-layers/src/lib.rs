//! Layer aggregation for cfgmerge.
//!
//! Turns the raw material a configuration client receives into one effective
//! configuration object:
//!
//! - namespace groups of `key`/`value` items are flattened into one mapping,
//!   with JSON-looking values decoded and private namespaces overriding public
//!   ones;
//! - response payloads, whatever cache path produced them, are normalized
//!   into plain trees and deep-merged in order.
//!
//! # Key Types
//!
//! - [`NamespaceGroup`] / [`ConfigItem`] -- One namespace's items and visibility
//! - [`Payload`] -- A response payload in one of its delivery forms
//! - [`LayerConfig`] -- Field names and decoding switches
//! - [`decode_value`] -- Best-effort JSON decoding of item values

pub mod config;
pub mod error;
pub mod namespace;
pub mod payload;
pub mod sniff;

pub use config::LayerConfig;
pub use error::{LayerError, LayerResult};
pub use namespace::{flatten_namespaces, flatten_namespaces_json, ConfigItem, NamespaceGroup, Visibility};
pub use payload::{merge_payloads, merge_payloads_json, Payload};
pub use sniff::{decode_value, looks_like_json};
