//! Error types for rfpbuddy
//!
//! Every recoverable failure in the RAG core is normalized close to its
//! source; this enum carries the ones that still need to travel.

use thiserror::Error;

/// Main error type for the rfpbuddy pipeline
#[derive(Error, Debug)]
pub enum RfpError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Cloud provider selected without an API key
    #[error("Missing credentials: {0} is not set")]
    MissingCredentials(String),

    /// Embedding model errors
    #[error("Embedding error: {0}")]
    EmbeddingError(String),

    /// Vector store errors
    #[error("Vector store error: {0}")]
    VectorStoreError(String),

    /// Completion provider errors
    #[error("Provider error: {0}")]
    ProviderError(String),

    /// Workbook / document adapter errors
    #[error("Document error: {0}")]
    DocumentError(String),

    /// Run interrupted by the user
    #[error("Interrupted after {completed} completed sections")]
    Interrupted { completed: usize },

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Generic errors with context
    #[error("{0}")]
    Generic(String),
}

/// Result type alias for rfpbuddy operations
pub type Result<T> = std::result::Result<T, RfpError>;

/// Convert anyhow errors to RfpError
impl From<anyhow::Error> for RfpError {
    fn from(err: anyhow::Error) -> Self {
        RfpError::Generic(format!("{:#}", err))
    }
}
