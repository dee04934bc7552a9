//! Value model: node identities, leaves, slot contents and keys.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Identity of a structured node inside a [`Forest`](crate::Forest).
///
/// Two slots holding the same `NodeId` refer to the same node: a change made
/// through one is visible through the other. Ids are only meaningful for the
/// forest that allocated them.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// Position of the node in its forest's allocation order.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId(#{})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A JSON leaf value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl Scalar {
    /// Returns `true` for [`Scalar::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Render as a plain JSON value.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Scalar::Null => serde_json::Value::Null,
            Scalar::Bool(b) => serde_json::Value::Bool(*b),
            Scalar::Number(n) => serde_json::Value::Number(n.clone()),
            Scalar::String(s) => serde_json::Value::String(s.clone()),
        }
    }
}

/// The content of a slot: a leaf, or a reference to a structured node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Scalar(Scalar),
    Node(NodeId),
}

impl Value {
    /// The null leaf.
    pub const fn null() -> Self {
        Value::Scalar(Scalar::Null)
    }

    /// Returns `true` if this is the null leaf.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Scalar(Scalar::Null))
    }

    /// The referenced node, if this value is structured.
    pub fn as_node(&self) -> Option<NodeId> {
        match self {
            Value::Node(id) => Some(*id),
            Value::Scalar(_) => None,
        }
    }

    /// The leaf, if this value is a scalar.
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(s) => Some(s),
            Value::Node(_) => None,
        }
    }

    /// The string leaf, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    /// The integer leaf, if any.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Scalar(Scalar::Number(n)) => n.as_i64(),
            _ => None,
        }
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        Value::Scalar(scalar)
    }
}

impl From<NodeId> for Value {
    fn from(id: NodeId) -> Self {
        Value::Node(id)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Scalar(Scalar::Bool(b))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Scalar(Scalar::Number(n.into()))
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Scalar(Scalar::Number(n.into()))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(Scalar::String(s.to_string()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(Scalar::String(s))
    }
}

/// Coarse classification of a value, used by the merge overwrite policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    Scalar,
    Sequence,
    Mapping,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Scalar => write!(f, "scalar"),
            Shape::Sequence => write!(f, "sequence"),
            Shape::Mapping => write!(f, "mapping"),
        }
    }
}

/// Attachment position of a child inside a structured node.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Index(usize),
    Name(String),
}

impl Key {
    /// The key as a sequence index, if it is one.
    ///
    /// Names qualify only in canonical decimal form (`"3"`, not `"03"`).
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Key::Index(i) => Some(*i),
            Key::Name(name) => {
                let index: usize = name.parse().ok()?;
                (index.to_string() == *name).then_some(index)
            }
        }
    }

    /// The key as a mapping name.
    pub fn to_name(&self) -> String {
        match self {
            Key::Index(i) => i.to_string(),
            Key::Name(name) => name.clone(),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(i) => write!(f, "[{i}]"),
            Key::Name(name) => write!(f, "{name:?}"),
        }
    }
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Key::Index(index)
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Name(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Name(name)
    }
}

/// A structured node stored in a forest.
///
/// Mapping entries iterate in insertion order; overwriting a key keeps its
/// original position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Sequence(Vec<Value>),
    Mapping(IndexMap<String, Value>),
}

impl Node {
    /// An empty node of the given shape. Scalars have no node form, so
    /// [`Shape::Scalar`] yields an empty mapping.
    pub fn empty(shape: Shape) -> Self {
        match shape {
            Shape::Sequence => Node::Sequence(Vec::new()),
            Shape::Mapping | Shape::Scalar => Node::Mapping(IndexMap::new()),
        }
    }

    pub fn shape(&self) -> Shape {
        match self {
            Node::Sequence(_) => Shape::Sequence,
            Node::Mapping(_) => Shape::Mapping,
        }
    }

    /// Number of direct children.
    pub fn len(&self) -> usize {
        match self {
            Node::Sequence(items) => items.len(),
            Node::Mapping(entries) => entries.len(),
        }
    }

    /// Returns `true` if the node has no children.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The value at `key`, if present.
    pub fn get(&self, key: &Key) -> Option<&Value> {
        match self {
            Node::Sequence(items) => key.as_index().and_then(|i| items.get(i)),
            Node::Mapping(entries) => match key {
                Key::Name(name) => entries.get(name),
                Key::Index(i) => entries.get(&i.to_string()),
            },
        }
    }

    /// Every direct child with its key, in iteration order.
    pub fn entries(&self) -> Vec<(Key, Value)> {
        match self {
            Node::Sequence(items) => items
                .iter()
                .enumerate()
                .map(|(i, v)| (Key::Index(i), v.clone()))
                .collect(),
            Node::Mapping(entries) => entries
                .iter()
                .map(|(k, v)| (Key::Name(k.clone()), v.clone()))
                .collect(),
        }
    }
}
