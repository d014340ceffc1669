//! API error types.
//!
//! Every error renders as the client envelope `{status, error}` with the
//! HTTP status equal to the envelope status.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use jobmatch_backend::BackendError;
use jobmatch_models::envelope::{Envelope, INTERNAL_ERROR_MESSAGE};
use thiserror::Error;
use tracing::{error, warn};

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Rate limited")]
    RateLimited,

    /// The backend answered with a non-2xx status.
    #[error("Backend returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Authorization token is missing.")]
    MissingAuthToken,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Backend error: {0}")]
    Backend(#[source] BackendError),
}

impl ApiError {
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn upstream(status: u16, body: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            body: body.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ApiError::MissingAuthToken | ApiError::Internal(_) | ApiError::Backend(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Envelope `error` text shown to the client.
    fn client_message(&self) -> String {
        match self {
            ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::BadRequest(msg) => msg.clone(),
            ApiError::RateLimited => "Rate limit exceeded. Please try again later.".to_string(),
            ApiError::Upstream { body, .. } => body.clone(),
            ApiError::MissingAuthToken => self.to_string(),
            ApiError::Internal(_) | ApiError::Backend(_) => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }

    pub fn to_envelope(&self) -> Envelope {
        match self {
            ApiError::Internal(_) | ApiError::Backend(_) => Envelope::internal(),
            _ => Envelope::error(self.status_code().as_u16(), self.client_message()),
        }
    }
}

impl From<BackendError> for ApiError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Status { status, body } => ApiError::Upstream { status, body },
            other => ApiError::Backend(other),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Internal(format!("JSON error: {}", err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Backend(e) if e.is_transport() => {
                error!(error = %e, "Backend unreachable or unreadable");
            }
            ApiError::Internal(_) | ApiError::Backend(_) | ApiError::MissingAuthToken => {
                error!(error = %self, "Request failed");
            }
            ApiError::Upstream { status, .. } => {
                warn!(status = %status, "Backend rejected request");
            }
            _ => {}
        }

        let envelope = self.to_envelope();
        (self.status_code(), Json(envelope)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_keeps_backend_status_and_text() {
        let err = ApiError::from(BackendError::from_http_status(422, "title can't be blank"));
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.to_envelope(), Envelope::error(422, "title can't be blank"));
    }

    #[test]
    fn test_transport_errors_are_generic_500() {
        let parse = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        let err = ApiError::from(BackendError::from(parse));
        let envelope = err.to_envelope();
        assert_eq!(envelope.status, 500);
        assert_eq!(envelope.error.as_deref(), Some(INTERNAL_ERROR_MESSAGE));
    }

    #[test]
    fn test_internal_detail_is_hidden() {
        let envelope = ApiError::internal("secret stack trace").to_envelope();
        assert_eq!(envelope.error.as_deref(), Some(INTERNAL_ERROR_MESSAGE));
    }

    #[test]
    fn test_missing_token_message_is_exposed() {
        let envelope = ApiError::MissingAuthToken.to_envelope();
        assert_eq!(envelope.status, 500);
        assert_eq!(envelope.error.as_deref(), Some("Authorization token is missing."));
    }

    #[test]
    fn test_invalid_upstream_status_becomes_bad_gateway() {
        assert_eq!(ApiError::upstream(42, "?").status_code(), StatusCode::BAD_GATEWAY);
    }
}
