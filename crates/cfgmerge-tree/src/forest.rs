//! Arena storage for structured nodes.
//!
//! A [`Forest`] owns every sequence and mapping it allocates. Nodes are never
//! freed individually; dropping the forest drops them all, which keeps cyclic
//! trees leak-free.

use crate::error::{TreeError, TreeResult};
use crate::node::{Key, Node, NodeId, Shape, Value};

/// Arena of structured nodes addressed by [`NodeId`].
#[derive(Clone, Debug, Default)]
pub struct Forest {
    nodes: Vec<Node>,
}

impl Forest {
    /// Create an empty forest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes allocated so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if no node has been allocated.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ---------------------------------------------------------------
    // Allocation
    // ---------------------------------------------------------------

    /// Store a node and return its identity.
    pub fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Allocate an empty mapping.
    pub fn new_mapping(&mut self) -> NodeId {
        self.alloc(Node::empty(Shape::Mapping))
    }

    /// Allocate an empty sequence.
    pub fn new_sequence(&mut self) -> NodeId {
        self.alloc(Node::empty(Shape::Sequence))
    }

    // ---------------------------------------------------------------
    // Access
    // ---------------------------------------------------------------

    /// Borrow a node.
    pub fn node(&self, id: NodeId) -> TreeResult<&Node> {
        self.nodes.get(id.index()).ok_or(TreeError::NodeNotFound(id))
    }

    /// Mutably borrow a node. Changes are visible through every slot that
    /// references `id`.
    pub fn node_mut(&mut self, id: NodeId) -> TreeResult<&mut Node> {
        self.nodes
            .get_mut(id.index())
            .ok_or(TreeError::NodeNotFound(id))
    }

    /// Classify a value.
    pub fn shape_of(&self, value: &Value) -> TreeResult<Shape> {
        match value {
            Value::Scalar(_) => Ok(Shape::Scalar),
            Value::Node(id) => Ok(self.node(*id)?.shape()),
        }
    }

    /// The value currently held at `key` inside `id`.
    pub fn slot(&self, id: NodeId, key: &Key) -> TreeResult<Option<&Value>> {
        Ok(self.node(id)?.get(key))
    }

    /// Install `value` at `key` inside `id`, replacing what was there.
    ///
    /// Index keys on a mapping are stored under their decimal name. Index
    /// keys past the end of a sequence pad the gap with nulls. A name can
    /// only address a sequence as a canonical index that overwrites an
    /// existing item or appends one; any other name is a
    /// [`TreeError::KeyShapeMismatch`].
    pub fn set(&mut self, id: NodeId, key: Key, value: Value) -> TreeResult<()> {
        match self.node_mut(id)? {
            Node::Mapping(entries) => {
                entries.insert(key.to_name(), value);
                Ok(())
            }
            Node::Sequence(items) => {
                let index = match &key {
                    Key::Index(index) => Some(*index),
                    Key::Name(_) => key.as_index().filter(|index| *index <= items.len()),
                };
                let Some((index, end)) = index.and_then(|i| i.checked_add(1).map(|end| (i, end)))
                else {
                    return Err(TreeError::KeyShapeMismatch { node: id, key });
                };
                if index >= items.len() {
                    items.resize(end, Value::null());
                }
                items[index] = value;
                Ok(())
            }
        }
    }

    /// Insert a named entry. Shorthand for [`set`](Self::set) with a name key.
    pub fn insert(
        &mut self,
        id: NodeId,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> TreeResult<()> {
        self.set(id, Key::Name(name.into()), value.into())
    }

    /// Append to a sequence.
    pub fn push(&mut self, id: NodeId, value: impl Into<Value>) -> TreeResult<()> {
        match self.node_mut(id)? {
            Node::Sequence(items) => {
                items.push(value.into());
                Ok(())
            }
            Node::Mapping(entries) => {
                let key = Key::Index(entries.len());
                Err(TreeError::KeyShapeMismatch { node: id, key })
            }
        }
    }

    /// Follow a JSON pointer (`/a/0/b`) from `root`.
    ///
    /// `~1` and `~0` decode to `/` and `~`. An empty pointer yields `root`.
    pub fn pointer<'a>(&'a self, root: &'a Value, pointer: &str) -> Option<&'a Value> {
        if pointer.is_empty() {
            return Some(root);
        }
        let rest = pointer.strip_prefix('/')?;
        let mut current = root;
        for token in rest.split('/') {
            let name = token.replace("~1", "/").replace("~0", "~");
            let id = current.as_node()?;
            current = self.node(id).ok()?.get(&Key::Name(name))?;
        }
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_assigns_sequential_ids() {
        let mut forest = Forest::new();
        let a = forest.new_mapping();
        let b = forest.new_sequence();
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(forest.len(), 2);
        assert_eq!(forest.shape_of(&Value::Node(b)).unwrap(), Shape::Sequence);
        assert_eq!(forest.shape_of(&Value::from(1)).unwrap(), Shape::Scalar);
    }

    #[test]
    fn unknown_node_is_an_error() {
        let forest = Forest::new();
        let stray = NodeId::from_index(9);
        assert!(matches!(forest.node(stray), Err(TreeError::NodeNotFound(id)) if id == stray));
    }

    #[test]
    fn sequence_set_pads_with_null() {
        let mut forest = Forest::new();
        let seq = forest.new_sequence();
        forest.set(seq, Key::Index(2), Value::from("c")).unwrap();
        let Node::Sequence(items) = forest.node(seq).unwrap() else {
            panic!("expected sequence");
        };
        assert_eq!(items, &vec![Value::null(), Value::null(), Value::from("c")]);
    }

    #[test]
    fn sequence_rejects_plain_names() {
        let mut forest = Forest::new();
        let seq = forest.new_sequence();
        forest.set(seq, Key::from("0"), Value::from(1)).unwrap();
        forest.set(seq, Key::from("0"), Value::from(2)).unwrap();
        let err = forest.set(seq, Key::from("name"), Value::from(1)).unwrap_err();
        assert!(matches!(err, TreeError::KeyShapeMismatch { .. }));
    }

    #[test]
    fn numeric_names_never_pad_a_sequence() {
        let mut forest = Forest::new();
        let seq = forest.new_sequence();
        forest.set(seq, Key::from("0"), Value::from("a")).unwrap();
        forest.set(seq, Key::from("1"), Value::from("b")).unwrap();
        for name in ["3", "100000000000", "18446744073709551615"] {
            let err = forest.set(seq, Key::from(name), Value::from(1)).unwrap_err();
            assert!(matches!(err, TreeError::KeyShapeMismatch { .. }), "{name}");
        }
        let err = forest.set(seq, Key::Index(usize::MAX), Value::from(1)).unwrap_err();
        assert!(matches!(err, TreeError::KeyShapeMismatch { .. }));
        assert_eq!(forest.node(seq).unwrap().len(), 2);
    }

    #[test]
    fn shared_node_mutation_is_visible_from_both_slots() {
        let mut forest = Forest::new();
        let root = forest.new_mapping();
        let shared = forest.new_mapping();
        forest.insert(root, "left", shared).unwrap();
        forest.insert(root, "right", shared).unwrap();

        forest.insert(shared, "x", 1).unwrap();

        let root = Value::Node(root);
        assert_eq!(forest.pointer(&root, "/left/x").and_then(Value::as_i64), Some(1));
        assert_eq!(forest.pointer(&root, "/right/x").and_then(Value::as_i64), Some(1));
    }

    #[test]
    fn pointer_walks_sequences_and_escapes() {
        let mut forest = Forest::new();
        let root = forest.new_mapping();
        let list = forest.new_sequence();
        let leaf = forest.new_mapping();
        forest.insert(root, "a/b", list).unwrap();
        forest.push(list, leaf).unwrap();
        forest.insert(leaf, "k", "v").unwrap();

        let root = Value::Node(root);
        assert_eq!(forest.pointer(&root, "/a~1b/0/k").and_then(Value::as_str), Some("v"));
        assert_eq!(forest.pointer(&root, ""), Some(&root));
        assert!(forest.pointer(&root, "/missing").is_none());
        assert!(forest.pointer(&root, "no-slash").is_none());
    }

    #[test]
    fn push_onto_mapping_fails() {
        let mut forest = Forest::new();
        let map = forest.new_mapping();
        assert!(forest.push(map, 1).is_err());
    }
}
