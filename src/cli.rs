// src/cli.rs

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Admission gateway for multi-language code execution.
///
/// Without `--config`, the built-in language set and server defaults are
/// used. CLI flags only override config values.
#[derive(Parser, Debug)]
#[command(name = "scriptgate", version, disable_help_subcommand = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// All supported CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP gateway.
    Serve {
        /// Path to a YAML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the listen address
        ///
        /// Example:
        /// --addr 0.0.0.0:3000
        #[arg(long)]
        addr: Option<String>,
    },

    /// Validate one request locally and print the result as JSON.
    ///
    /// Exits non-zero when the request is rejected.
    Check {
        /// Path to a YAML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Target language (case-insensitive)
        #[arg(short, long)]
        language: String,

        /// Read the script from a file
        #[arg(long, conflicts_with = "script", required_unless_present = "script")]
        file: Option<PathBuf>,

        /// Pass the script inline
        #[arg(long)]
        script: Option<String>,
    },

    /// List the configured languages and their syntax prechecks.
    Languages {
        /// Path to a YAML config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}
