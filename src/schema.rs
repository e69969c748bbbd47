// src/schema.rs

//! Structural rules for an execution request.
//!
//! Shape only: which fields exist and whether they are non-empty strings.
//! What the language means is the registry's job.

use serde_json::Value;

use crate::error::{Detail, ValidationError};
use crate::request::{Field, RawRequest};

/// A request that passed the structural rules. The language is still the
/// raw token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shaped {
    pub language: String,
    pub script: String,
}

/// Apply the structural rules. Every violation is reported, `language`
/// before `script`.
pub fn check_shape(raw: RawRequest) -> Result<Shaped, ValidationError> {
    let mut details = Vec::new();

    let language = required_string("language", raw.language, &mut details);
    let script = required_string("script", raw.script, &mut details);

    match (language, script) {
        (Some(language), Some(script)) => Ok(Shaped { language, script }),
        _ => Err(ValidationError::structural(details)),
    }
}

/// Decode an arbitrary JSON body. Anything other than an object is rejected
/// before the field rules run.
pub fn decode(value: Value) -> Result<RawRequest, ValidationError> {
    if !value.is_object() {
        return Err(ValidationError::structural(vec![Detail::not_an_object()]));
    }

    serde_json::from_value(value)
        .map_err(|_| ValidationError::structural(vec![Detail::not_an_object()]))
}

fn required_string(name: &str, field: Field, details: &mut Vec<Detail>) -> Option<String> {
    match field {
        Field::Missing => {
            details.push(Detail::required(name));
            None
        }
        Field::Present(Value::String(s)) if s.is_empty() => {
            details.push(Detail::empty(name));
            None
        }
        Field::Present(Value::String(s)) => Some(s),
        Field::Present(_) => {
            details.push(Detail::not_a_string(name));
            None
        }
    }
}
