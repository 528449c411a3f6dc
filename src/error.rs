//! Error types for the Folio service.

use thiserror::Error;

/// Main error type for Folio operations.
#[derive(Error, Debug)]
pub enum FolioError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Content store query or decoding errors
    #[error("Content store error: {0}")]
    Content(String),

    /// Transactional email delivery errors
    #[error("Mail delivery error: {0}")]
    Mail(String),

    /// Outbound HTTP errors
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Folio operations.
pub type Result<T> = std::result::Result<T, FolioError>;
