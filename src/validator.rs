// src/validator.rs

//! The admission pipeline.
//!
//! schema rules → language normalization → optional syntax precheck.
//!
//! The first failing stage ends the pipeline. A [`Validator`] holds only the
//! immutable registry, so one instance is shared (behind an `Arc`) by every
//! concurrent request.

use serde_json::Value;

use crate::error::{Detail, ValidationError};
use crate::registry::LanguageRegistry;
use crate::request::{RawRequest, ValidatedRequest};
use crate::schema::{check_shape, decode};

#[derive(Debug, Clone, Default)]
pub struct Validator {
    registry: LanguageRegistry,
}

impl Validator {
    pub fn new(registry: LanguageRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &LanguageRegistry {
        &self.registry
    }

    /// Validate and normalize a request.
    ///
    /// On success the result carries the lowercase language and the script
    /// unchanged. Feeding that result back in returns it as-is.
    pub fn validate(&self, raw: RawRequest) -> Result<ValidatedRequest, ValidationError> {
        let result = self.run(raw);

        match &result {
            Ok(req) => tracing::debug!(
                language = %req.language,
                script_len = req.script.len(),
                "request admitted"
            ),
            Err(err) => tracing::debug!(error = %err, "request rejected"),
        }

        result
    }

    /// Validate an arbitrary JSON body.
    pub fn validate_value(&self, body: Value) -> Result<ValidatedRequest, ValidationError> {
        let raw = decode(body).inspect_err(|err| {
            tracing::debug!(error = %err, "request rejected");
        })?;
        self.validate(raw)
    }

    fn run(&self, raw: RawRequest) -> Result<ValidatedRequest, ValidationError> {
        let shaped = check_shape(raw)?;
        let language = self.registry.normalize(&shaped.language)?;

        if let Some(checker) = self.registry.syntax_checker(language) {
            checker.check(&shaped.script).map_err(|diagnostic| {
                ValidationError::structural(vec![Detail::syntax("script", &diagnostic)])
            })?;
        }

        Ok(ValidatedRequest {
            language: language.to_string(),
            script: shaped.script,
        })
    }
}
