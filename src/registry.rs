// src/registry.rs

//! Language registry.
//!
//! Holds the configured set of supported languages, keyed by their canonical
//! lowercase name, together with each language's syntax capability. The set is
//! injected at startup, never hardwired, so tests can build registries from
//! synthetic languages.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::{default_languages, Config, LanguageSpec};
use crate::error::ValidationError;
use crate::syntax::{SyntaxCheck, SyntaxKind};

#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    languages: BTreeMap<String, SyntaxKind>,
}

/// Public view of one registry entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageInfo {
    pub name: String,
    pub syntax: SyntaxKind,
}

impl LanguageRegistry {
    /// Build a registry. Names are lowercased; blank or duplicate names and an
    /// empty set are configuration errors.
    pub fn new(specs: impl IntoIterator<Item = LanguageSpec>) -> Result<Self> {
        let mut languages = BTreeMap::new();

        for spec in specs {
            let name = spec.name.trim().to_lowercase();
            if name.is_empty() {
                bail!("Language names must not be blank");
            }
            if languages.insert(name.clone(), spec.syntax).is_some() {
                bail!("Language configured more than once: {}", name);
            }
        }

        if languages.is_empty() {
            bail!("At least one language must be configured");
        }

        Ok(Self { languages })
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        Self::new(cfg.languages.iter().cloned()).context("Invalid languages configuration")
    }

    /// A registry without syntax prechecks.
    pub fn from_names(names: &[&str]) -> Result<Self> {
        Self::new(
            names
                .iter()
                .map(|name| LanguageSpec::new(*name, SyntaxKind::None)),
        )
    }

    /// Lowercase `token` and look it up. The error keeps the token exactly as
    /// submitted.
    pub fn normalize(&self, token: &str) -> Result<&str, ValidationError> {
        let lowered = token.to_lowercase();
        self.languages
            .get_key_value(lowered.as_str())
            .map(|(name, _)| name.as_str())
            .ok_or_else(|| ValidationError::UnsupportedLanguage(token.to_string()))
    }

    pub fn syntax_checker(&self, canonical: &str) -> Option<&'static dyn SyntaxCheck> {
        self.languages
            .get(canonical)
            .and_then(|kind| kind.checker())
    }

    /// All languages, sorted by name.
    pub fn languages(&self) -> Vec<LanguageInfo> {
        self.languages
            .iter()
            .map(|(name, syntax)| LanguageInfo {
                name: name.clone(),
                syntax: *syntax,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self {
            languages: default_languages()
                .into_iter()
                .map(|spec| (spec.name, spec.syntax))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn normalizes_case() {
        let registry = LanguageRegistry::default();
        assert_eq!(registry.normalize("PYTHON"), Ok("python"));
        assert_eq!(registry.normalize("Java"), Ok("java"));
        assert_eq!(registry.normalize("sqlite3"), Ok("sqlite3"));
    }

    #[test]
    fn unsupported_keeps_original_token() {
        let registry = LanguageRegistry::default();
        assert_eq!(
            registry.normalize("RuBy"),
            Err(ValidationError::UnsupportedLanguage("RuBy".to_string()))
        );
    }

    #[test]
    fn does_not_trim_tokens() {
        let registry = LanguageRegistry::default();
        assert!(registry.normalize(" python").is_err());
    }

    #[test]
    fn synthetic_sets() {
        let registry = LanguageRegistry::from_names(&["Ruby", "cobol"]).unwrap();
        assert_eq!(registry.normalize("ruby"), Ok("ruby"));
        assert!(registry.normalize("python").is_err());
        assert!(registry.syntax_checker("ruby").is_none());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn rejects_bad_sets() {
        assert!(LanguageRegistry::from_names(&[]).is_err());
        assert!(LanguageRegistry::from_names(&["  "]).is_err());

        let err = LanguageRegistry::from_names(&["go", "GO"]).unwrap_err();
        assert_eq!(err.to_string(), "Language configured more than once: go");
    }

    #[test]
    fn default_capabilities() {
        let registry = LanguageRegistry::default();
        assert_eq!(registry.syntax_checker("python").map(|c| c.name()), Some("python"));
        assert_eq!(registry.syntax_checker("java").map(|c| c.name()), Some("java"));
        assert!(registry.syntax_checker("javascript").is_none());
        assert!(registry.syntax_checker("unknown").is_none());
    }

    #[test]
    fn listing_is_sorted() {
        let names: Vec<String> = LanguageRegistry::default()
            .languages()
            .into_iter()
            .map(|l| l.name)
            .collect();

        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert_eq!(names.len(), 11);
    }
}
