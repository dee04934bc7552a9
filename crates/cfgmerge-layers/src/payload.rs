//! Response-payload merging.
//!
//! The same namespace can reach the client in different forms depending on
//! the cache path that served it: an already parsed object, raw JSON text, or
//! a response envelope whose body carries the configuration either as JSON
//! text or as an object. Every payload is normalized to a plain tree and the
//! trees are deep-merged in list order onto an empty mapping.

use serde_json::{Map, Value};
use tracing::debug;

use cfgmerge_merge::merge_json;

use crate::config::LayerConfig;
use crate::error::{LayerError, LayerResult};

/// A response payload in one of its delivery forms.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    /// An already parsed configuration tree.
    Tree(Value),
    /// Configuration serialized as JSON text.
    Encoded(String),
    /// A response envelope holding the body under
    /// [`LayerConfig::envelope_field`].
    Response(Value),
}

impl Payload {
    /// Guess the delivery form of a raw payload.
    ///
    /// Strings are JSON text. An object is a response when the envelope
    /// field is its only key, or when the body under it carries the encoded
    /// or inline field. Anything else is taken as a parsed tree, so a config
    /// that merely has a key named like the envelope keeps all its keys.
    pub fn classify(raw: Value, config: &LayerConfig) -> Self {
        match raw {
            Value::String(text) => Payload::Encoded(text),
            Value::Object(map) if is_envelope(&map, config) => Payload::Response(Value::Object(map)),
            other => Payload::Tree(other),
        }
    }

    /// Reduce the payload to a plain tree. `index` is only used for error
    /// reporting.
    pub fn normalize(self, index: usize, config: &LayerConfig) -> LayerResult<Value> {
        match self {
            Payload::Tree(tree) => Ok(tree),
            Payload::Encoded(text) => parse(index, &text),
            Payload::Response(Value::Object(mut envelope)) => {
                let body = envelope.remove(&config.envelope_field).unwrap_or(Value::Null);
                unwrap_body(index, body, config)
            }
            Payload::Response(_) => Err(LayerError::MalformedPayload {
                index,
                reason: "response envelope is not an object".into(),
            }),
        }
    }
}

fn is_envelope(map: &Map<String, Value>, config: &LayerConfig) -> bool {
    let Some(body) = map.get(&config.envelope_field) else {
        return false;
    };
    map.len() == 1
        || body.as_object().is_some_and(|body| {
            body.contains_key(&config.encoded_field) || body.contains_key(&config.inline_field)
        })
}

fn unwrap_body(index: usize, body: Value, config: &LayerConfig) -> LayerResult<Value> {
    match body {
        Value::Null => Err(LayerError::MalformedPayload {
            index,
            reason: format!("response has no `{}` body", config.envelope_field),
        }),
        Value::String(text) => parse(index, &text),
        Value::Object(map) => {
            if let Some(encoded) = map.get(&config.encoded_field).filter(|v| is_set(v)) {
                let Value::String(text) = encoded else {
                    return Err(LayerError::MalformedPayload {
                        index,
                        reason: format!("`{}` must hold JSON text", config.encoded_field),
                    });
                };
                return parse(index, text);
            }
            if let Some(inline) = map.get(&config.inline_field).filter(|v| is_set(v)) {
                return Ok(inline.clone());
            }
            Ok(Value::Object(map))
        }
        other => Ok(other),
    }
}

/// Whether a body field counts as present: null, `false`, zero and the empty
/// string do not.
fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn parse(index: usize, text: &str) -> LayerResult<Value> {
    serde_json::from_str(text).map_err(|source| LayerError::Parse { index, source })
}

/// Normalize `payloads` and deep-merge them in order onto an empty mapping.
///
/// The first payload that cannot be normalized aborts the call.
pub fn merge_payloads(
    payloads: impl IntoIterator<Item = Payload>,
    config: &LayerConfig,
) -> LayerResult<Value> {
    let trees = payloads
        .into_iter()
        .enumerate()
        .map(|(index, payload)| payload.normalize(index, config))
        .collect::<LayerResult<Vec<_>>>()?;

    debug!(payloads = trees.len(), "merging response payloads");
    Ok(merge_json(&Value::Object(Map::new()), &trees)?)
}

/// Merge raw JSON payloads, classifying each with [`Payload::classify`].
///
/// Fails with [`LayerError::InvalidArgument`] unless `payloads` is an array.
pub fn merge_payloads_json(payloads: &Value, config: &LayerConfig) -> LayerResult<Value> {
    let Value::Array(items) = payloads else {
        return Err(LayerError::InvalidArgument("payloads must be an array".into()));
    };
    merge_payloads(
        items.iter().cloned().map(|raw| Payload::classify(raw, config)),
        config,
    )
}
