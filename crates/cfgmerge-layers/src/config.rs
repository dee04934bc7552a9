use serde::{Deserialize, Serialize};

/// Field names and switches used while aggregating layers.
///
/// The defaults match the response shapes of an Apollo-style config service:
/// bodies wrapped under `data`, cached bodies carrying JSON text under
/// `content`, uncached bodies carrying an object under `configurations`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerConfig {
    /// Envelope field holding the response body.
    pub envelope_field: String,
    /// Body field holding the configuration as JSON text.
    pub encoded_field: String,
    /// Body field holding the configuration as an object.
    pub inline_field: String,
    /// Whether namespace item values that look like JSON are decoded.
    pub decode_values: bool,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            envelope_field: "data".into(),
            encoded_field: "content".into(),
            inline_field: "configurations".into(),
            decode_values: true,
        }
    }
}
