//! Error types for netvis.
//!
//! Uses `thiserror` for ergonomic error definitions. Only input validation
//! and configuration can fail a run; probe failures never surface here.

use crate::scanner::PacingError;
use crate::types::{PortError, TargetError, WindowError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine configuration directory")]
    DirectoryNotFound,

    #[error("failed to read {}: {reason}", path.display())]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid settings file: {0}")]
    InvalidFormat(String),
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Top-level error for a CLI run.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Target(#[from] TargetError),

    #[error(transparent)]
    Port(#[from] PortError),

    #[error(transparent)]
    Window(#[from] WindowError),

    #[error(transparent)]
    Pacing(#[from] PacingError),

    #[error("probe timeout must be at least 1 ms")]
    ZeroTimeout,

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("output error: {0}")]
    Output(#[from] std::io::Error),
}

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;
