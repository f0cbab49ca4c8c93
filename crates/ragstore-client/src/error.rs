//! Error types for backend operations.

use thiserror::Error;

/// Errors that can occur when talking to the RAG backend.
#[derive(Error, Debug)]
pub enum RagStoreError {
    /// The client has no usable credentials, so no network call was
    /// attempted.
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Network or protocol failure talking to the backend.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend replied but omitted a required field.
    #[error("Invalid response from backend: {0}")]
    InvalidResponse(String),

    /// An ingestion operation reached a terminal failure state.
    #[error("Ingestion failed: {0}")]
    IngestionFailed(String),

    /// An ingestion operation was still pending after the configured
    /// number of status checks.
    #[error("Operation still pending after {attempts} status checks")]
    Timeout { attempts: u32 },
}

/// Result type for backend operations.
pub type RagStoreResult<T> = Result<T, RagStoreError>;

impl From<reqwest::Error> for RagStoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            RagStoreError::Transport(format!("connection failed: {}", err))
        } else if err.is_timeout() {
            RagStoreError::Transport(format!("request timed out: {}", err))
        } else {
            RagStoreError::Transport(err.to_string())
        }
    }
}
