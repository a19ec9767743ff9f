//! Common error types for mixtrace

use thiserror::Error;

/// Common result type for mixtrace operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the mixtrace crates
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed match candidate from the fingerprint matcher.
    ///
    /// Raised at construction/validation time; one bad record fails the whole
    /// batch rather than being silently dropped, since silent drops could hide
    /// systematic matcher bugs.
    #[error("Invalid candidate: {0}")]
    InvalidCandidate(String),

    /// Declared mix duration was zero or negative (a caller input error)
    #[error("Empty mix: declared duration {0} seconds")]
    EmptyMix(f64),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error (wraps serde_json::Error)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
