//! Recursive, shape-preserving sanitization of JSON payloads.

use crate::text::sanitize_text;
use serde_json::{Map, Value};

/// Sanitize every string reachable through a JSON object.
///
/// Returns a freshly built map with the same keys. Per entry:
/// - strings are passed through [`sanitize_text`]
/// - arrays keep their length and order; string elements are sanitized,
///   object elements are recursed into, every other element is copied as-is
/// - nested objects are recursed into
/// - numbers, booleans and null are copied as-is
///
/// Arrays nested directly inside arrays are copied without inspection.
///
/// ```
/// use clinigate_sanitize::sanitize_structure;
/// use serde_json::json;
///
/// let input = json!({"note": "<script>x</script>ok", "age": 41});
/// let clean = sanitize_structure(input.as_object().unwrap());
/// assert_eq!(clean["note"], "ok");
/// assert_eq!(clean["age"], 41);
/// ```
#[must_use]
pub fn sanitize_structure(input: &Map<String, Value>) -> Map<String, Value> {
    input
        .iter()
        .map(|(key, value)| (key.clone(), sanitize_entry(value)))
        .collect()
}

fn sanitize_entry(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(sanitize_text(s)),
        Value::Array(items) => Value::Array(items.iter().map(sanitize_element).collect()),
        Value::Object(map) => Value::Object(sanitize_structure(map)),
        other => other.clone(),
    }
}

fn sanitize_element(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(sanitize_text(s)),
        Value::Object(map) => Value::Object(sanitize_structure(map)),
        other => other.clone(),
    }
}

/// Sanitize an arbitrary request body.
///
/// Objects go through [`sanitize_structure`], top-level strings through
/// [`sanitize_text`]; a top-level array is treated like an array entry of an
/// object. Scalars are copied unchanged.
#[must_use]
pub fn sanitize_value(value: &Value) -> Value {
    sanitize_entry(value)
}
