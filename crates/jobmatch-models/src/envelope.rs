//! Client-facing response envelope.
//!
//! Every gateway endpoint answers with `{status, response|message|error}`.
//! Exactly one of the three payload fields is set.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Generic error text used whenever internal detail must not leak.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// Normalized response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// HTTP status mirrored into the body.
    pub status: u16,
    /// Parsed backend payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
    /// Fixed human-readable success message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Error text (backend body verbatim, or a generic message).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Envelope {
    /// Successful envelope carrying a payload.
    pub fn payload(response: Value) -> Self {
        Self {
            status: 200,
            response: Some(response),
            message: None,
            error: None,
        }
    }

    /// Successful envelope carrying a fixed message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: 200,
            response: None,
            message: Some(message.into()),
            error: None,
        }
    }

    /// Error envelope with an explicit status.
    pub fn error(status: u16, error: impl Into<String>) -> Self {
        Self {
            status,
            response: None,
            message: None,
            error: Some(error.into()),
        }
    }

    /// Generic 500 envelope.
    pub fn internal() -> Self {
        Self::error(500, INTERNAL_ERROR_MESSAGE)
    }
}
