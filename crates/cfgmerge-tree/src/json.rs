//! Conversion between forests and plain [`serde_json::Value`] trees.
//!
//! Both directions walk an explicit stack, so nesting depth is bounded by
//! memory rather than by the call stack.

use std::collections::HashSet;

use serde_json::{Map, Value as Json};

use crate::error::{TreeError, TreeResult};
use crate::forest::Forest;
use crate::node::{Key, Node, NodeId, Scalar, Value};

impl Forest {
    /// Copy a plain JSON tree into the forest.
    ///
    /// Every array and object becomes a freshly allocated node; the result
    /// shares nothing with previously imported trees.
    pub fn import(&mut self, json: &Json) -> TreeResult<Value> {
        let root = match json {
            Json::Array(items) => self.alloc(Node::Sequence(vec![Value::null(); items.len()])),
            Json::Object(_) => self.alloc(Node::Mapping(Default::default())),
            scalar => return Ok(Value::Scalar(scalar_from_json(scalar))),
        };

        let mut stack: Vec<(NodeId, &Json)> = vec![(root, json)];
        while let Some((id, json)) = stack.pop() {
            let children: Vec<(Key, &Json)> = match json {
                Json::Array(items) => items
                    .iter()
                    .enumerate()
                    .map(|(i, v)| (Key::Index(i), v))
                    .collect(),
                Json::Object(entries) => entries
                    .iter()
                    .map(|(k, v)| (Key::Name(k.clone()), v))
                    .collect(),
                _ => continue,
            };
            for (key, child) in children {
                let value = match child {
                    Json::Array(items) => {
                        let node = self.alloc(Node::Sequence(vec![Value::null(); items.len()]));
                        stack.push((node, child));
                        Value::Node(node)
                    }
                    Json::Object(_) => {
                        let node = self.alloc(Node::Mapping(Default::default()));
                        stack.push((node, child));
                        Value::Node(node)
                    }
                    scalar => Value::Scalar(scalar_from_json(scalar)),
                };
                self.set(id, key, value)?;
            }
        }

        Ok(Value::Node(root))
    }

    /// Render a tree as plain JSON.
    ///
    /// Shared nodes are written out once per attachment point. Fails with
    /// [`TreeError::Cycle`] if a node is reachable from itself.
    pub fn export(&self, value: &Value) -> TreeResult<Json> {
        enum Frame<'a> {
            Visit(&'a Value),
            Close(NodeId),
        }

        let mut frames = vec![Frame::Visit(value)];
        let mut built: Vec<Json> = Vec::new();
        let mut on_path: HashSet<NodeId> = HashSet::new();

        while let Some(frame) = frames.pop() {
            match frame {
                Frame::Visit(Value::Scalar(scalar)) => built.push(scalar.to_json()),
                Frame::Visit(Value::Node(id)) => {
                    if !on_path.insert(*id) {
                        return Err(TreeError::Cycle(*id));
                    }
                    frames.push(Frame::Close(*id));
                    let children: Vec<&Value> = match self.node(*id)? {
                        Node::Sequence(items) => items.iter().collect(),
                        Node::Mapping(entries) => entries.values().collect(),
                    };
                    frames.extend(children.into_iter().rev().map(Frame::Visit));
                }
                Frame::Close(id) => {
                    on_path.remove(&id);
                    let node = self.node(id)?;
                    let children = built.split_off(built.len() - node.len());
                    let json = match node {
                        Node::Sequence(_) => Json::Array(children),
                        Node::Mapping(entries) => {
                            let map: Map<String, Json> =
                                entries.keys().cloned().zip(children).collect();
                            Json::Object(map)
                        }
                    };
                    built.push(json);
                }
            }
        }

        Ok(built.pop().unwrap_or(Json::Null))
    }
}

fn scalar_from_json(json: &Json) -> Scalar {
    match json {
        Json::Bool(b) => Scalar::Bool(*b),
        Json::Number(n) => Scalar::Number(n.clone()),
        Json::String(s) => Scalar::String(s.clone()),
        Json::Null | Json::Array(_) | Json::Object(_) => Scalar::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn import_export_preserves_structure() {
        let mut forest = Forest::new();
        let original = json!({
            "name": "app",
            "port": 8080,
            "ratio": 0.5,
            "enabled": true,
            "owner": null,
            "tags": ["a", "b", {"nested": [1, [2, 3]]}],
            "db": {"host": "localhost", "pool": {"min": 1, "max": 8}}
        });
        let value = forest.import(&original).unwrap();
        assert_eq!(forest.export(&value).unwrap(), original);
    }

    #[test]
    fn export_keeps_key_insertion_order() {
        let mut forest = Forest::new();
        let value = forest.import(&json!({"zeta": 1, "alpha": {"m": 2, "b": 3}})).unwrap();
        let text = serde_json::to_string(&forest.export(&value).unwrap()).unwrap();
        assert_eq!(text, r#"{"zeta":1,"alpha":{"m":2,"b":3}}"#);
    }

    #[test]
    fn scalar_import_allocates_nothing() {
        let mut forest = Forest::new();
        let value = forest.import(&json!("plain")).unwrap();
        assert_eq!(value, Value::from("plain"));
        assert!(forest.is_empty());
        assert_eq!(forest.export(&value).unwrap(), json!("plain"));
    }

    #[test]
    fn separate_imports_do_not_share_nodes() {
        let mut forest = Forest::new();
        let doc = json!({"a": {"b": 1}});
        let first = forest.import(&doc).unwrap();
        let second = forest.import(&doc).unwrap();
        assert_ne!(first, second);
        assert_ne!(forest.pointer(&first, "/a"), forest.pointer(&second, "/a"));
    }

    #[test]
    fn shared_nodes_export_at_each_attachment() {
        let mut forest = Forest::new();
        let root = forest.new_mapping();
        let shared = forest.new_mapping();
        forest.insert(shared, "x", 1).unwrap();
        forest.insert(root, "a", shared).unwrap();
        forest.insert(root, "b", shared).unwrap();

        let exported = forest.export(&Value::Node(root)).unwrap();
        assert_eq!(exported, json!({"a": {"x": 1}, "b": {"x": 1}}));
    }

    #[test]
    fn export_rejects_cycles() {
        let mut forest = Forest::new();
        let root = forest.new_mapping();
        forest.insert(root, "self", root).unwrap();
        let err = forest.export(&Value::Node(root)).unwrap_err();
        assert!(matches!(err, TreeError::Cycle(id) if id == root));
    }

    #[test]
    fn deep_nesting_does_not_overflow() {
        let mut doc = json!(0);
        for _ in 0..20_000 {
            doc = json!([doc]);
        }
        let mut forest = Forest::new();
        let value = forest.import(&doc).unwrap();
        assert_eq!(forest.len(), 20_000);
        let exported = forest.export(&value).unwrap();
        // Dropping deeply nested serde_json values recurses; leak both.
        assert!(exported.is_array());
        std::mem::forget(exported);
        std::mem::forget(doc);
    }
}
