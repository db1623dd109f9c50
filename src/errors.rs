// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

use crate::action::ScriptFailures;
use crate::jobsupervisor::monit::MonitError;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// One or more dispatched scripts reported failure. Carries the full
    /// results map so callers never lose the successful entries.
    #[error("{0}")]
    ScriptsFailed(ScriptFailures),

    /// Every completion sink was dropped before all dispatched scripts
    /// signalled.
    #[error("expected {expected} script results but only {received} arrived")]
    MissingScriptSignals { expected: usize, received: usize },

    #[error("{0} could not be found")]
    SupervisorNotFound(String),

    #[error(
        "Failed to reload monit after {attempts} attempts: before={before:?} after={after:?}"
    )]
    ReloadExhausted {
        attempts: u32,
        before: Option<u64>,
        after: Option<u64>,
    },

    #[error(transparent)]
    Monit(#[from] MonitError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, AgentError>;
