// src/request.rs

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A request field as submitted: absent, or present with any JSON value
/// (including `null`). Keeping the raw value lets the schema rules tell
/// "missing" apart from "wrong type".
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Field {
    #[default]
    Missing,
    Present(Value),
}

impl<'de> Deserialize<'de> for Field {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Field::Present)
    }
}

impl From<String> for Field {
    fn from(value: String) -> Self {
        Field::Present(Value::String(value))
    }
}

impl From<&str> for Field {
    fn from(value: &str) -> Self {
        Field::Present(Value::from(value))
    }
}

/// An execution request before validation.
///
/// Unknown properties are ignored during deserialization, so they never make
/// it past this type.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawRequest {
    #[serde(default)]
    pub language: Field,

    #[serde(default)]
    pub script: Field,
}

impl RawRequest {
    pub fn new(language: impl Into<String>, script: impl Into<String>) -> Self {
        Self {
            language: Field::from(language.into()),
            script: Field::from(script.into()),
        }
    }
}

/// The canonical request handed to the execution backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidatedRequest {
    /// Lowercase, always a member of the configured language set.
    pub language: String,

    /// Exactly as submitted.
    pub script: String,
}

impl From<ValidatedRequest> for RawRequest {
    fn from(req: ValidatedRequest) -> Self {
        Self::new(req.language, req.script)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn distinguishes_missing_from_null() {
        let raw: RawRequest = serde_json::from_value(json!({ "language": null })).unwrap();

        assert_eq!(raw.language, Field::Present(Value::Null));
        assert_eq!(raw.script, Field::Missing);
    }

    #[test]
    fn ignores_unknown_properties() {
        let raw: RawRequest = serde_json::from_value(json!({
            "language": "java",
            "script": "x",
            "extraParam": "additional"
        }))
        .unwrap();

        assert_eq!(raw, RawRequest::new("java", "x"));
    }

    #[test]
    fn validated_request_serializes_two_fields() {
        let req = ValidatedRequest {
            language: "python".to_string(),
            script: "print(1)".to_string(),
        };

        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({ "language": "python", "script": "print(1)" })
        );
    }
}
