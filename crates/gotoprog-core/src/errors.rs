//! Error types for model construction, configuration and pass execution.
//!
//! Unresolvable virtual calls are not errors (they degrade to `SKIP`), and
//! malformed instructions are contract breaches that panic. What remains
//! here are the failures a caller can act on.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by checked mutations of the symbol and function tables.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("symbol `{0}` is already defined")]
    DuplicateSymbol(String),

    #[error("function `{0}` already has a body")]
    DuplicateFunction(String),

    #[error("function `{0}` is not in the function table")]
    UnknownFunction(String),
}

/// Errors raised while loading or validating a [`PassConfig`](crate::config::PassConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported config format `{0}` (expected .yaml, .yml or .json)")]
    UnsupportedFormat(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Errors returned by [`GotoPass::run`](crate::optimizer::GotoPass::run) and
/// [`Optimizer::optimize`](crate::optimizer::Optimizer::optimize).
#[derive(Error, Debug)]
pub enum PassError {
    #[error("entry point `{0}` is not defined in the function table")]
    MissingEntryPoint(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
