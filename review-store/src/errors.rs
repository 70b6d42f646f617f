//! Unified error types for the crate.

use reqwest::StatusCode;
use thiserror::Error;

/// Top-level error for review-store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O or filesystem errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Input dump could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// A required variable is absent or empty.
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Vector backend answered with a non-successful status.
    #[error("{backend} returned {status} for {url}: {snippet}")]
    HttpStatus {
        backend: &'static str,
        status: StatusCode,
        url: String,
        snippet: String,
    },

    /// Response payload could not be decoded.
    #[error("{backend} decode error: {reason}")]
    Decode {
        backend: &'static str,
        reason: String,
    },

    /// Underlying HTTP transport error.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Qdrant client errors (wrapped).
    #[error("qdrant error: {0}")]
    Qdrant(String),

    /// Embedding provider failed or returned an unexpected shape.
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Mismatch in vector dimensionality across records.
    #[error("vector size mismatch: got {got}, want {want}")]
    VectorSizeMismatch { got: usize, want: usize },
}

impl StoreError {
    /// Returns `true` when the error comes from configuration, not from the backend.
    pub fn is_config(&self) -> bool {
        matches!(self, StoreError::MissingVar(_) | StoreError::Config(_))
    }
}
