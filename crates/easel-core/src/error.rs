//! Error types for easel.

use thiserror::Error;

/// Result type alias using easel's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for easel operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Client input rejected (missing or malformed request data)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Inference/critique call failed
    #[error("Inference error: {0}")]
    Inference(String),

    /// Page template rendering failed
    #[error("Template error: {0}")]
    Template(String),

    /// Site deployment failed (CLI run, output parse, or version lookup)
    #[error("Deployment error: {0}")]
    Deployment(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}
