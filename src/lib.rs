// src/lib.rs

//! scriptgate
//!
//! The admission layer of a multi-language code-execution gateway. A request
//! names a language and carries a script; the [`Validator`] decides whether it
//! may be handed to an execution backend, returning either a canonical
//! [`ValidatedRequest`] or a structured [`ValidationError`].
//!
//! The HTTP surface (`server`), the backend client and the CLI are thin
//! wrappers around that pipeline.

pub mod auth;
pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod registry;
pub mod request;
pub mod request_id;
pub mod runner;
pub mod schema;
pub mod server;
pub mod syntax;
pub mod util;
pub mod validator;

pub use config::{Config, LanguageSpec};
pub use error::{Detail, DetailKind, ValidationError};
pub use registry::LanguageRegistry;
pub use request::{Field, RawRequest, ValidatedRequest};
pub use syntax::{SyntaxCheck, SyntaxDiagnostic, SyntaxKind};
pub use validator::Validator;
