//! Coercion of text form fields into typed values.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::AppError;

static LEADING_INT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([+-]?\d+)").expect("leading integer pattern is valid")
});

/// Parses the leading integer of `raw`, so `"12px"` yields 12 and `"px"` yields `None`.
pub fn parse_int_lenient(raw: &str) -> Option<i64> {
    LEADING_INT
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Only the literal `"true"` is true.
pub fn parse_flag(raw: &str) -> bool {
    raw == "true"
}

/// Treats an empty submitted value like an absent one.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Parses a JSON-encoded array of strings. Blank input is an empty list;
/// anything else that is not an array of strings is a validation error.
pub fn parse_string_list(field: &str, raw: &str) -> Result<Vec<String>, AppError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str::<Vec<String>>(raw)
        .map_err(|_| AppError::field(field, "Must be a JSON array of strings"))
}
