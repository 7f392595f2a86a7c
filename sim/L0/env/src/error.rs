//! Error types for the environment runtime.

use std::path::PathBuf;

use sim_core::StepError;
use sim_mjcf::MjcfError;
use thiserror::Error;

/// A parameter could not be read or has the wrong shape.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Parameter exists but holds a value of the wrong type.
    #[error("parameter `{key}` must be {expected}, got {found}")]
    WrongType {
        /// Full `/`-separated key.
        key: String,
        /// Human-readable description of the accepted type.
        expected: &'static str,
        /// The offending value, rendered as JSON.
        found: String,
    },

    /// A parameter file could not be read.
    #[error("failed to read parameter file {path}: {source}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A parameter document is not valid JSON.
    #[error("invalid parameter document: {0}")]
    Json(#[from] serde_json::Error),

    /// A parameter document's root is not a JSON object.
    #[error("parameter document root must be an object, got {0}")]
    NotAnObject(String),
}

impl ConfigError {
    pub(crate) fn wrong_type(
        key: impl Into<String>,
        expected: &'static str,
        found: &serde_json::Value,
    ) -> Self {
        Self::WrongType {
            key: key.into(),
            expected,
            found: found.to_string(),
        }
    }
}

/// Startup failed before the stepping loop could begin.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Model file missing, unparsable, or structurally invalid.
    #[error(transparent)]
    Model(#[from] MjcfError),

    /// Startup parameters are ill-typed.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors surfaced by [`Environment`](crate::Environment) entry points.
#[derive(Debug, Error)]
pub enum EnvError {
    /// Fatal startup failure.
    #[error("failed to load environment: {0}")]
    Load(#[from] LoadError),

    /// Parameters read on reset are ill-typed.
    #[error("invalid parameters: {0}")]
    Config(#[from] ConfigError),

    /// The physics step failed; the loop stops.
    #[error("physics step failed: {0}")]
    Step(#[from] StepError),

    /// Control call on an environment that is shutting down or terminated.
    #[error("environment is no longer running")]
    InvalidControlCall,

    /// Control call before the model finished loading.
    #[error("no model is loaded")]
    NotLoaded,

    /// [`Environment::run`](crate::Environment::run) was called twice.
    #[error("environment has already been started")]
    AlreadyStarted,
}

/// Result type for environment operations.
pub type Result<T> = std::result::Result<T, EnvError>;
