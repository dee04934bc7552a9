//! Best-effort decoding of JSON-looking strings.
//!
//! Config item values arrive as text. Some of them are JSON documents that
//! should become structured values; most are plain strings. A cheap syntactic
//! check runs first: escapes are masked, then string literals, `true`,
//! `false`, `null` and numbers collapse to `]`, then array openers are
//! dropped. If only brackets, commas, colons and whitespace remain, the text
//! is handed to the JSON parser. Any parse failure keeps the raw string.

use std::sync::LazyLock;

use regex_lite::Regex;
use serde_json::Value;
use tracing::trace;

static ESCAPES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\\["\\/bfnrtu]"#).expect("escape pattern"));

static TOKENS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""[^"\\\n\r]*"|true|false|null|-?\d+(?:\.\d*)?(?:[eE][+-]?\d+)?"#)
        .expect("token pattern")
});

static OPENERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|:|,)(?:\s*\[)+").expect("opener pattern"));

static STRUCTURE_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\],:{}\s]*$").expect("structure pattern"));

/// Returns `true` if `text` is syntactically shaped like a JSON document.
///
/// This is a filter, not a validator: it may accept text the parser then
/// rejects (unbalanced brackets, empty input), never the reverse for
/// ordinary documents.
pub fn looks_like_json(text: &str) -> bool {
    let masked = ESCAPES.replace_all(text, "@");
    let masked = TOKENS.replace_all(&masked, "]");
    let masked = OPENERS.replace_all(&masked, "");
    STRUCTURE_ONLY.is_match(&masked)
}

/// Decode `text` as JSON when it looks like JSON, else keep it as a string.
///
/// Never fails.
pub fn decode_value(text: &str) -> Value {
    if looks_like_json(text) {
        match serde_json::from_str(text) {
            Ok(value) => return value,
            Err(e) => trace!(error = %e, "JSON-shaped value did not parse; keeping raw text"),
        }
    }
    Value::String(text.to_string())
}
