//! Error handling module for CompressX

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Main error type for CompressX operations
#[derive(Error, Debug)]
pub enum CompressXError {
    /// Input file not found or inaccessible
    #[error("Input file does not exist: {path}")]
    InputFileNotFound { path: String },

    /// Quality token outside `bad`, `ok`, `good`
    #[error("Invalid quality parameter: {token}. Use \"bad\", \"ok\", or \"good\".")]
    InvalidQuality { token: String },

    /// Configuration could not be loaded
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Workflow failure
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON rendering error
    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for CompressX operations
pub type CompressXResult<T> = std::result::Result<T, CompressXError>;
