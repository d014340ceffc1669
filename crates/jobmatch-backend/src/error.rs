//! Backend client error types.

use thiserror::Error;

/// Result type for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors that can occur while talking to the backend service.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BackendError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an error from a non-2xx backend answer.
    pub fn from_http_status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// True when the backend was never reached or answered garbage.
    pub fn is_transport(&self) -> bool {
        matches!(self, BackendError::Network(_) | BackendError::Json(_))
    }
}
