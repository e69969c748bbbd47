// src/config.rs

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

use crate::registry::LanguageRegistry;
use crate::syntax::SyntaxKind;

/// Root configuration, usually loaded from `scriptgate.yaml`.
///
/// This file controls:
/// - Which languages the gateway admits, and which syntax precheck each uses
/// - Where the HTTP server listens and how large a body it accepts
/// - Where validated requests are forwarded for execution
///
/// Every section is optional. A missing file means built-in defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    /// Execution backend. Without one, `/execute` answers 503.
    #[serde(default)]
    pub backend: Option<BackendConfig>,

    /// Supported languages
    ///
    /// Example:
    ///
    /// languages:
    ///   - name: python
    ///     syntax: python
    ///   - name: sqlite3
    #[serde(default = "default_languages")]
    pub languages: Vec<LanguageSpec>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            backend: None,
            languages: default_languages(),
        }
    }
}

/// HTTP server section.
///
/// server:
///   addr: 127.0.0.1:3000
///   require_api_key: true
///   max_body_bytes: 67108864
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_addr")]
    pub addr: String,

    /// Require `Authorization: Bearer $SCRIPTGATE_API_KEY` on every route
    /// except `/health`.
    #[serde(default)]
    pub require_api_key: bool,

    /// Transport limit only; the validator itself has no size cap.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            require_api_key: false,
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_addr() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_max_body_bytes() -> usize {
    64 * 1024 * 1024
}

/// Execution backend section.
///
/// backend:
///   url: http://localhost:8080/run
///   timeout_ms: 30000
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    pub url: String,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    30_000
}

/// One supported language.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LanguageSpec {
    pub name: String,

    #[serde(default)]
    pub syntax: SyntaxKind,
}

impl LanguageSpec {
    pub fn new(name: impl Into<String>, syntax: SyntaxKind) -> Self {
        Self {
            name: name.into(),
            syntax,
        }
    }
}

/// The language set the gateway ships with.
pub fn default_languages() -> Vec<LanguageSpec> {
    [
        ("java", SyntaxKind::Java),
        ("nodejs", SyntaxKind::None),
        ("javascript", SyntaxKind::None),
        ("promptv1", SyntaxKind::None),
        ("promptv2", SyntaxKind::None),
        ("multifile", SyntaxKind::None),
        ("sqlite3", SyntaxKind::None),
        ("php", SyntaxKind::None),
        ("go", SyntaxKind::Go),
        ("rust", SyntaxKind::None),
        ("python", SyntaxKind::Python),
    ]
    .into_iter()
    .map(|(name, syntax)| LanguageSpec::new(name, syntax))
    .collect()
}

impl Config {
    /// Load and parse a YAML config from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        Self::from_yaml(&raw)
    }

    /// Parse a YAML config and reject an unusable language list.
    pub fn from_yaml(raw: &str) -> Result<Self> {
        let cfg: Self = serde_yaml::from_str(raw).context("Failed to parse YAML config")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Fails when the language list is empty, has a blank name, or names a
    /// language twice.
    pub fn validate(&self) -> Result<()> {
        LanguageRegistry::from_config(self).map(|_| ())
    }

    /// `Config::load` when a path is given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}
