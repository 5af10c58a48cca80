//! Parameter Extractor — turns the extraction call's output into `ExtractedParameters`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::interview::sanitize::{parse_json_lenient, strip_code_fence, LenientParse};

/// Used when the model gives no usable amount.
pub const DEFAULT_AMOUNT: u32 = 10;
/// Upper bound on questions per interview.
pub const MAX_AMOUNT: u32 = 50;
/// Used when the model gives no interview type.
pub const DEFAULT_INTERVIEW_TYPE: &str = "mixed";

/// Structured parameters recovered from a conversation transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedParameters {
    pub role: String,
    pub level: String,
    /// Comma-separated, as the model produced it. Split when the record is built.
    pub techstack: String,
    #[serde(rename = "type")]
    pub interview_type: String,
    /// Always in `1..=MAX_AMOUNT`.
    pub amount: u32,
}

/// Cleans and lenient-parses the raw extraction response.
///
/// Returns `None` when no JSON object can be recovered; the caller treats that as a
/// failed request.
pub fn extract_parameters(raw: &str) -> Option<ExtractedParameters> {
    let cleaned = strip_code_fence(Some(raw));
    match parse_json_lenient(Some(&cleaned)) {
        LenientParse::Parsed(Value::Object(fields)) => Some(parameters_from_object(&fields)),
        _ => None,
    }
}

pub fn parameters_from_object(fields: &Map<String, Value>) -> ExtractedParameters {
    let interview_type = string_field(fields, "type");
    ExtractedParameters {
        role: string_field(fields, "role"),
        level: string_field(fields, "level"),
        techstack: string_field(fields, "techstack"),
        interview_type: if interview_type.is_empty() {
            DEFAULT_INTERVIEW_TYPE.to_string()
        } else {
            interview_type
        },
        amount: resolve_amount(fields.get("amount")),
    }
}

fn string_field(fields: &Map<String, Value>, key: &str) -> String {
    fields
        .get(key)
        .map(coerce_to_string)
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Textual form of a JSON value: strings verbatim, arrays joined with `,`, null empty.
pub fn coerce_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(coerce_to_string)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_string(),
    }
}

/// Integer amounts pass through, anything else is parsed from its text.
/// Non-positive or unparseable values become `DEFAULT_AMOUNT`; the result is capped
/// at `MAX_AMOUNT`.
pub fn resolve_amount(raw: Option<&Value>) -> u32 {
    let parsed = match raw {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => match n.as_i64() {
            Some(i) => Some(i),
            None if n.is_u64() => Some(i64::MAX),
            None => parse_leading_int(&n.to_string()),
        },
        Some(other) => parse_leading_int(&coerce_to_string(other)),
    };

    match parsed {
        Some(n) if n > 0 => n.min(MAX_AMOUNT as i64) as u32,
        _ => DEFAULT_AMOUNT,
    }
}

/// Parses an optional sign and the leading run of digits, ignoring whatever follows.
fn parse_leading_int(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let digits: &str = &rest[..rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len())];
    if digits.is_empty() {
        return None;
    }

    // Overflowing digit runs saturate; the cap makes the exact value irrelevant.
    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Splits a comma-separated techstack, trimming and dropping empty segments.
pub fn split_techstack(techstack: &str) -> Vec<String> {
    techstack
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
