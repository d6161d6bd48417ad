//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
///
/// None of these are fatal to the experience: callers log them and continue
/// in a degraded mode.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An external resource (camera, image, audio) could not be obtained.
    #[error("resource unavailable: {0}")]
    ResourceUnavailable(String),

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration values are missing or inconsistent.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An infrastructure error (encoding, I/O).
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
