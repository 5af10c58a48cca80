//! Output Sanitizer — best-effort recovery of JSON values from free-form model text.
//!
//! Models wrap JSON in code fences, prepend commentary, or apologise instead of answering.
//! Nothing in here returns an error: failing to find JSON is a normal outcome that the
//! caller branches on through [`LenientParse`].

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

/// Character budget for any raw model text echoed back in diagnostics.
pub const DIAGNOSTIC_LIMIT: usize = 2000;

/// Outcome of [`parse_json_lenient`].
#[derive(Debug, Clone, PartialEq)]
pub enum LenientParse {
    Parsed(Value),
    Failed,
}

impl LenientParse {
    pub fn value(&self) -> Option<&Value> {
        match self {
            LenientParse::Parsed(v) => Some(v),
            LenientParse::Failed => None,
        }
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            LenientParse::Parsed(v) => Some(v),
            LenientParse::Failed => None,
        }
    }

    /// Names what was produced, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            LenientParse::Parsed(Value::Array(_)) => "array",
            LenientParse::Parsed(Value::Object(_)) => "object",
            LenientParse::Parsed(Value::String(_)) => "string",
            LenientParse::Parsed(Value::Number(_)) => "number",
            LenientParse::Parsed(Value::Bool(_)) => "boolean",
            LenientParse::Parsed(Value::Null) => "null",
            LenientParse::Failed => "none",
        }
    }
}

fn fence_pattern() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| Regex::new(r"(?i)```(?:json)?").expect("fence pattern is valid"))
}

// The array branch is anchored to end-of-text: an array followed by trailing commentary
// is not recovered.
fn embedded_json_pattern() -> &'static Regex {
    static EMBEDDED: OnceLock<Regex> = OnceLock::new();
    EMBEDDED.get_or_init(|| {
        Regex::new(r"\{[\s\S]*\}|\[[\s\S]*\]$").expect("embedded JSON pattern is valid")
    })
}

/// Removes ```` ```json ```` / ```` ``` ```` markers anywhere in the text and trims it.
///
/// Removal repeats until no marker is left, so the function is idempotent.
pub fn strip_code_fence(text: Option<&str>) -> String {
    let fence = fence_pattern();
    let mut cleaned = text.unwrap_or_default().to_string();
    while fence.is_match(&cleaned) {
        cleaned = fence.replace_all(&cleaned, "").into_owned();
    }
    cleaned.trim().to_string()
}

/// Strict parse first, then the first embedded object (or trailing array).
pub fn parse_json_lenient(text: Option<&str>) -> LenientParse {
    let Some(text) = text.filter(|t| !t.trim().is_empty()) else {
        return LenientParse::Failed;
    };

    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return LenientParse::Parsed(value);
    }

    embedded_json_pattern()
        .find(text)
        .and_then(|m| serde_json::from_str::<Value>(m.as_str()).ok())
        .map(LenientParse::Parsed)
        .unwrap_or(LenientParse::Failed)
}

/// Caps `text` at `limit` characters, appending how many were dropped.
pub fn truncate(text: &str, limit: usize) -> String {
    let total = text.chars().count();
    if total <= limit {
        return text.to_string();
    }
    let kept: String = text.chars().take(limit).collect();
    format!("{kept}... [truncated {} chars]", total - limit)
}

/// [`truncate`] at [`DIAGNOSTIC_LIMIT`], passing absence through.
pub fn truncate_diagnostic(text: Option<&str>) -> Option<String> {
    text.map(|t| truncate(t, DIAGNOSTIC_LIMIT))
}
