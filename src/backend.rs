// src/backend.rs

//! Client for the execution backend.
//!
//! The gateway never runs code itself. Once a request is admitted it is
//! POSTed as `{ language, script }` and the backend answers `{ output }`.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::BackendConfig;
use crate::request::ValidatedRequest;

/// What the backend returns for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionOutput {
    pub output: String,
}

#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl BackendClient {
    pub fn new(cfg: &BackendConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: cfg.url.clone(),
            timeout: Duration::from_millis(cfg.timeout_ms),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Forward an admitted request. Non-2xx answers become errors carrying
    /// the status and body.
    pub async fn run(&self, request: &ValidatedRequest) -> Result<ExecutionOutput> {
        let resp = self
            .http
            .post(&self.url)
            .json(request)
            .timeout(self.timeout)
            .send()
            .await
            .with_context(|| format!("Failed to reach execution backend at {}", self.url))?;

        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();

        if !status.is_success() {
            bail!("Execution backend failed: {} {}", status, text);
        }

        serde_json::from_str(&text).context("Execution backend returned invalid JSON")
    }
}
