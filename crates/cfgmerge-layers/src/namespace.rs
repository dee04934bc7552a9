//! Namespace-layer flattening.
//!
//! A config service answers a "list namespaces" request with one group per
//! namespace, each holding `key`/`value` items and a public/private flag.
//! Flattening projects every group into one flat mapping: public namespaces
//! first, private namespaces on top. Overrides here are shallow, last key
//! wins; no deep merge is involved.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::LayerConfig;
use crate::error::{LayerError, LayerResult};
use crate::sniff::decode_value;

/// One configuration entry of a namespace.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigItem {
    pub key: String,
    pub value: String,
}

impl ConfigItem {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Precedence class of a namespace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Private,
}

/// The items of one namespace together with its visibility.
///
/// Deserializes from the service's wire shape
/// (`{"namespaceName": .., "isPublic": .., "items": [..]}`); other fields are
/// ignored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace_name: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub items: Vec<ConfigItem>,
}

impl NamespaceGroup {
    /// A public group with the given items.
    pub fn public(items: Vec<ConfigItem>) -> Self {
        Self {
            namespace_name: None,
            is_public: true,
            items,
        }
    }

    /// A private group with the given items.
    pub fn private(items: Vec<ConfigItem>) -> Self {
        Self {
            namespace_name: None,
            is_public: false,
            items,
        }
    }

    /// Attach a namespace name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.namespace_name = Some(name.into());
        self
    }

    pub fn visibility(&self) -> Visibility {
        if self.is_public {
            Visibility::Public
        } else {
            Visibility::Private
        }
    }
}

/// Flatten namespace groups into one mapping.
///
/// Within each visibility class, groups keep their relative order and later
/// items override earlier ones with the same key. Private values then
/// override public ones.
pub fn flatten_namespaces(groups: &[NamespaceGroup], config: &LayerConfig) -> Map<String, Value> {
    let mut public = Map::new();
    let mut private = Map::new();

    for group in groups {
        let layer = match group.visibility() {
            Visibility::Public => &mut public,
            Visibility::Private => &mut private,
        };
        for item in &group.items {
            let value = if config.decode_values {
                decode_value(&item.value)
            } else {
                Value::String(item.value.clone())
            };
            layer.insert(item.key.clone(), value);
        }
        debug!(
            namespace = group.namespace_name.as_deref().unwrap_or("<unnamed>"),
            visibility = ?group.visibility(),
            items = group.items.len(),
            "flattened namespace"
        );
    }

    let mut flat = public;
    flat.extend(private);
    flat
}

/// Flatten groups given as raw JSON.
///
/// Fails with [`LayerError::InvalidArgument`] unless `groups` is an array of
/// well-formed groups.
pub fn flatten_namespaces_json(groups: &Value, config: &LayerConfig) -> LayerResult<Map<String, Value>> {
    if !groups.is_array() {
        return Err(LayerError::InvalidArgument(
            "namespace groups must be an array".into(),
        ));
    }
    let groups: Vec<NamespaceGroup> = serde_json::from_value(groups.clone())
        .map_err(|e| LayerError::InvalidArgument(format!("malformed namespace group: {e}")))?;
    Ok(flatten_namespaces(&groups, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn flatten(groups: &[NamespaceGroup]) -> Value {
        Value::Object(flatten_namespaces(groups, &LayerConfig::default()))
    }

    #[test]
    fn private_overrides_public() {
        let groups = vec![
            NamespaceGroup::public(vec![ConfigItem::new("k", "1")]),
            NamespaceGroup::private(vec![ConfigItem::new("k", "2")]),
        ];
        assert_eq!(flatten(&groups), json!({"k": 2}));
    }

    #[test]
    fn private_wins_even_when_listed_first() {
        let groups = vec![
            NamespaceGroup::private(vec![ConfigItem::new("k", "private")]),
            NamespaceGroup::public(vec![ConfigItem::new("k", "public"), ConfigItem::new("p", "x")]),
        ];
        assert_eq!(flatten(&groups), json!({"k": "private", "p": "x"}));
    }

    #[test]
    fn later_items_win_within_a_class() {
        let groups = vec![
            NamespaceGroup::public(vec![ConfigItem::new("a", "1"), ConfigItem::new("a", "2")]),
            NamespaceGroup::public(vec![ConfigItem::new("a", "3"), ConfigItem::new("b", "4")]),
            NamespaceGroup::private(vec![ConfigItem::new("c", "5")]),
            NamespaceGroup::private(vec![ConfigItem::new("c", "6")]),
        ];
        assert_eq!(flatten(&groups), json!({"a": 3, "b": 4, "c": 6}));
    }

    #[test]
    fn override_is_shallow() {
        let groups = vec![
            NamespaceGroup::public(vec![ConfigItem::new("db", r#"{"host":"a","port":1}"#)]),
            NamespaceGroup::private(vec![ConfigItem::new("db", r#"{"host":"b"}"#)]),
        ];
        assert_eq!(flatten(&groups), json!({"db": {"host": "b"}}));
    }

    #[test]
    fn values_are_sniffed() {
        let groups = vec![NamespaceGroup::public(vec![
            ConfigItem::new("obj", r#"{"x":1}"#),
            ConfigItem::new("word", "hello"),
            ConfigItem::new("empty", ""),
        ])];
        assert_eq!(flatten(&groups), json!({"obj": {"x": 1}, "word": "hello", "empty": ""}));
    }

    #[test]
    fn decoding_can_be_disabled() {
        let config = LayerConfig {
            decode_values: false,
            ..Default::default()
        };
        let groups = vec![NamespaceGroup::public(vec![ConfigItem::new("n", "1")])];
        assert_eq!(Value::Object(flatten_namespaces(&groups, &config)), json!({"n": "1"}));
    }

    #[test]
    fn wire_shape_deserializes() {
        let raw = json!([
            {"namespaceName": "application", "isPublic": false, "appId": "svc",
             "items": [{"key": "timeout", "value": "30", "comment": "seconds"}]},
            {"namespaceName": "shared.common", "isPublic": true,
             "items": [{"key": "timeout", "value": "10"}, {"key": "region", "value": "eu"}]}
        ]);
        let flat = flatten_namespaces_json(&raw, &LayerConfig::default()).unwrap();
        assert_eq!(Value::Object(flat), json!({"timeout": 30, "region": "eu"}));

        let groups: Vec<NamespaceGroup> = serde_json::from_value(raw).unwrap();
        assert_eq!(groups[0].namespace_name.as_deref(), Some("application"));
        assert_eq!(groups[1].visibility(), Visibility::Public);
    }

    #[test]
    fn non_array_argument_is_rejected() {
        let err = flatten_namespaces_json(&json!({"items": []}), &LayerConfig::default()).unwrap_err();
        assert!(matches!(err, LayerError::InvalidArgument(_)));

        let err = flatten_namespaces_json(&json!([{"items": 3}]), &LayerConfig::default()).unwrap_err();
        assert!(matches!(err, LayerError::InvalidArgument(_)));
    }

    #[test]
    fn no_groups_flatten_to_empty() {
        assert_eq!(flatten(&[]), json!({}));
        let named = NamespaceGroup::public(Vec::new()).named("empty");
        assert_eq!(named.namespace_name.as_deref(), Some("empty"));
        assert_eq!(flatten(&[named]), json!({}));
    }
}
