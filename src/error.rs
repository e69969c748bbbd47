// src/error.rs

//! Validation failures and the shape they take on the wire.
//!
//! Every rejection produced by the admission pipeline is a [`ValidationError`].
//! Callers see exactly two JSON shapes:
//!
//! - structural: `{ "details": [ { "message", "path", "type" }, ... ] }`
//! - semantic:   `{ "message": "Unsupported language: <token>" }`
//!
//! Callers pattern-match on `details[0].message`, so the wording produced by
//! the [`Detail`] constructors is part of the public contract.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use thiserror::Error;

use crate::syntax::SyntaxDiagnostic;

/// The rule a field violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DetailKind {
    #[serde(rename = "any.required")]
    Required,
    #[serde(rename = "string.base")]
    NotAString,
    #[serde(rename = "string.empty")]
    Empty,
    #[serde(rename = "object.base")]
    NotAnObject,
    #[serde(rename = "script.syntax")]
    Syntax,
}

/// One field-level problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Detail {
    /// Human readable message, e.g. `"script" is required`.
    pub message: String,

    /// Path to the offending field. Empty when the whole body is at fault.
    pub path: Vec<String>,

    #[serde(rename = "type")]
    pub kind: DetailKind,
}

impl Detail {
    pub fn required(field: &str) -> Self {
        Self::field(field, DetailKind::Required, format!("\"{field}\" is required"))
    }

    pub fn not_a_string(field: &str) -> Self {
        Self::field(
            field,
            DetailKind::NotAString,
            format!("\"{field}\" must be a string"),
        )
    }

    pub fn empty(field: &str) -> Self {
        Self::field(
            field,
            DetailKind::Empty,
            format!("\"{field}\" is not allowed to be empty"),
        )
    }

    pub fn not_an_object() -> Self {
        Self {
            message: "\"value\" must be of type object".to_string(),
            path: Vec::new(),
            kind: DetailKind::NotAnObject,
        }
    }

    /// A syntax precheck failure. The diagnostic's class tag (`SyntaxError`)
    /// and position are kept in the message.
    pub fn syntax(field: &str, diagnostic: &SyntaxDiagnostic) -> Self {
        Self::field(
            field,
            DetailKind::Syntax,
            format!("\"{field}\" contains invalid syntax: {diagnostic}"),
        )
    }

    fn field(field: &str, kind: DetailKind, message: String) -> Self {
        Self {
            message,
            path: vec![field.to_string()],
            kind,
        }
    }
}

/// A request that must not reach the execution backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The request shape (or the script's syntax) is wrong.
    #[error("{}", join_messages(.details))]
    Structural { details: Vec<Detail> },

    /// The language does not normalize into the configured set.
    /// Carries the token exactly as submitted.
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),
}

impl ValidationError {
    pub fn structural(details: Vec<Detail>) -> Self {
        Self::Structural { details }
    }

    /// Field-level details. Empty for semantic errors.
    pub fn details(&self) -> &[Detail] {
        match self {
            Self::Structural { details } => details,
            Self::UnsupportedLanguage(_) => &[],
        }
    }

    /// The message a caller should display: the first detail for structural
    /// errors, the top-level message otherwise.
    pub fn first_message(&self) -> String {
        match self.details().first() {
            Some(detail) => detail.message.clone(),
            None => self.to_string(),
        }
    }
}

fn join_messages(details: &[Detail]) -> String {
    details
        .iter()
        .map(|d| d.message.as_str())
        .collect::<Vec<_>>()
        .join(". ")
}

impl Serialize for ValidationError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Self::Structural { details } => map.serialize_entry("details", details)?,
            Self::UnsupportedLanguage(_) => map.serialize_entry("message", &self.to_string())?,
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn structural_serializes_details_only() {
        let err = ValidationError::structural(vec![Detail::required("script")]);

        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({
                "details": [
                    { "message": "\"script\" is required", "path": ["script"], "type": "any.required" }
                ]
            })
        );
    }

    #[test]
    fn unsupported_language_serializes_message_only() {
        let err = ValidationError::UnsupportedLanguage("Ruby".to_string());

        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({ "message": "Unsupported language: Ruby" })
        );
        assert!(err.details().is_empty());
    }

    #[test]
    fn display_joins_all_details() {
        let err = ValidationError::structural(vec![
            Detail::required("language"),
            Detail::empty("script"),
        ]);

        assert_eq!(
            err.to_string(),
            "\"language\" is required. \"script\" is not allowed to be empty"
        );
        assert_eq!(err.first_message(), "\"language\" is required");
    }

    #[test]
    fn whole_body_detail_has_empty_path() {
        let detail = Detail::not_an_object();
        assert!(detail.path.is_empty());
        assert_eq!(detail.message, "\"value\" must be of type object");
    }
}
