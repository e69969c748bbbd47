// src/runner.rs

use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::registry::LanguageRegistry;
use crate::request::RawRequest;
use crate::server;
use crate::util::read_to_string;
use crate::validator::Validator;

use anyhow::{bail, Result};
use std::path::PathBuf;

/// Entry point from `main.rs`.
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Serve { config, addr } => {
            let mut cfg = Config::load_or_default(config.as_deref())?;

            // CLI overrides
            if let Some(addr) = addr {
                cfg.server.addr = addr;
            }

            server::serve(cfg).await
        }

        Command::Check {
            config,
            language,
            file,
            script,
        } => check(config, language, file, script),

        Command::Languages { config } => list_languages(config),
    }
}

/* ---------------- check ---------------- */

fn check(
    config: Option<PathBuf>,
    language: String,
    file: Option<PathBuf>,
    script: Option<String>,
) -> Result<()> {
    let cfg = Config::load_or_default(config.as_deref())?;
    let validator = Validator::new(LanguageRegistry::from_config(&cfg)?);

    let script = match (file, script) {
        (Some(path), _) => read_to_string(&path)?,
        (None, Some(inline)) => inline,
        (None, None) => bail!("Either --file or --script is required"),
    };

    match validator.validate(RawRequest::new(language, script)) {
        Ok(validated) => {
            println!("{}", serde_json::to_string_pretty(&validated)?);
            Ok(())
        }
        Err(err) => {
            println!("{}", serde_json::to_string_pretty(&err)?);
            bail!("Request rejected: {}", err.first_message())
        }
    }
}

/* ---------------- languages ---------------- */

fn list_languages(config: Option<PathBuf>) -> Result<()> {
    let cfg = Config::load_or_default(config.as_deref())?;
    let registry = LanguageRegistry::from_config(&cfg)?;

    println!("{}", serde_json::to_string_pretty(&registry.languages())?);
    Ok(())
}
