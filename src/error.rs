//! Error types for catalog operations.

use thiserror::Error;

/// Main error type for all catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Missing or malformed caller input (empty query, non-numeric id).
    #[error("{0}")]
    Validation(String),

    /// The provider answered successfully but had no match.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The provider answered with a non-success HTTP status.
    #[error("Upstream returned status {status}: {message}")]
    Upstream { status: u16, message: String },

    /// The provider answered 200 with an error payload.
    #[error("API error: {0}")]
    ApiError(String),

    /// A single attempt exceeded its timeout.
    #[error("Request timed out")]
    Timeout,

    /// HTTP request failed.
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),

    /// I/O operation failed.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl CatalogError {
    /// True for upstream 4xx responses.
    pub fn is_client_error(&self) -> bool {
        matches!(self, CatalogError::Upstream { status, .. } if (400..500).contains(status))
    }
}

/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
