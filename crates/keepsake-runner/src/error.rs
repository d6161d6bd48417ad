//! Keepsake runner — error types.

use keepsake_core::error::DomainError;
use thiserror::Error;

/// Startup and runtime errors for the runner.
#[derive(Debug, Error)]
pub enum AppError {
    /// An environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The engine rejected its configuration.
    #[error("engine error: {0}")]
    Domain(#[from] DomainError),

    /// Reading the config file or writing output failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
