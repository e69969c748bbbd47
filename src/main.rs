// src/main.rs

//! scriptgate
//!
//! Entry point for the scriptgate CLI.
//!
//! Responsibilities of this file:
//! - Load `.env` and initialise logging
//! - Parse CLI arguments
//! - Hand off to the runner
//!
//! There is intentionally *no business logic* here.

use anyhow::Result;
use clap::Parser;
use scriptgate::{cli, runner};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "scriptgate=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();

    runner::run(cli).await
}
