//! Typed request payloads that have been through the sanitizer.

use crate::structure::sanitize_structure;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Errors produced while turning a raw body into a sanitized, typed payload.
///
/// Sanitization itself never fails; these cover parsing and typing only.
#[derive(Debug, Error)]
pub enum SanitizeError {
    /// The payload was valid JSON but not an object.
    #[error("Payload must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    /// The payload could not be parsed or did not match the target type.
    #[error("Payload deserialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for payload sanitization.
pub type Result<T> = std::result::Result<T, SanitizeError>;

/// A payload whose string fields were sanitized before deserialization.
///
/// Handlers that write to storage or build LLM prompts take this instead of
/// the raw body so the sanitizer cannot be forgotten.
///
/// ```
/// use clinigate_sanitize::Sanitized;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Intake {
///     complaint: String,
/// }
///
/// let body = br#"{"complaint": " headache<script>x()</script> "}"#;
/// let intake = Sanitized::<Intake>::from_slice(body).unwrap();
/// assert_eq!(intake.complaint, "headache");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Sanitized<T>(pub T);

impl<T: DeserializeOwned> Sanitized<T> {
    /// Sanitize a JSON object and deserialize it into `T`.
    pub fn from_value(value: &Value) -> Result<Self> {
        let map = value
            .as_object()
            .ok_or_else(|| SanitizeError::NotAnObject(kind_of(value)))?;
        let clean = sanitize_structure(map);
        Ok(Sanitized(serde_json::from_value(Value::Object(clean))?))
    }

    /// Parse a raw body, sanitize it and deserialize it into `T`.
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(body)?;
        Self::from_value(&value)
    }
}

impl<T> Sanitized<T> {
    /// Get the inner payload.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for Sanitized<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Prompt {
        question: String,
        tags: Vec<String>,
        severity: u8,
    }

    #[test]
    fn deserializes_sanitized_fields() {
        let body = json!({
            "question": "Is 5mg safe?\0 javascript:alert(1)",
            "tags": ["<script>x</script>dosage", " cardio "],
            "severity": 3
        });

        let prompt = Sanitized::<Prompt>::from_value(&body).unwrap().into_inner();

        assert_eq!(
            prompt,
            Prompt {
                question: "Is 5mg safe? alert(1)".to_string(),
                tags: vec!["dosage".to_string(), "cardio".to_string()],
                severity: 3,
            }
        );
    }

    #[test]
    fn rejects_non_object_payloads() {
        let err = Sanitized::<Prompt>::from_value(&json!(["a"])).unwrap_err();
        assert!(matches!(err, SanitizeError::NotAnObject("array")));
    }

    #[test]
    fn reports_malformed_json() {
        let err = Sanitized::<Prompt>::from_slice(b"{not json").unwrap_err();
        assert!(matches!(err, SanitizeError::Json(_)));
    }

    #[test]
    fn reports_type_mismatch_after_sanitizing() {
        let err = Sanitized::<Prompt>::from_value(&json!({"question": "q"})).unwrap_err();
        assert!(matches!(err, SanitizeError::Json(_)));
    }
}
