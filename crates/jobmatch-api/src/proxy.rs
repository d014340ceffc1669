//! Authenticated proxy plumbing shared by all handlers.
//!
//! A proxy handler resolves the request's token, builds one backend call,
//! and turns whatever comes back into an [`Envelope`]:
//! - 2xx: status 200 with the parsed payload or a fixed message
//! - non-2xx: the backend status with its body text verbatim
//! - transport or parse failure: a generic 500

use axum::extract::FromRequest;
use axum::Json;
use jobmatch_backend::{path_segment, BackendCall};
use jobmatch_models::Envelope;
use serde_json::Value;

use crate::error::{ApiError, ApiResult};

/// What a successful backend answer becomes.
#[derive(Debug, Clone, Copy)]
pub enum OnSuccess {
    /// Forward the parsed backend body as `response`.
    Payload,
    /// Drop the backend body and answer with a fixed `message`.
    Message(&'static str),
}

/// Send `call` and normalize the outcome.
pub async fn forward(call: BackendCall<'_>, on_success: OnSuccess) -> ApiResult<Json<Envelope>> {
    let response = call.send().await?.error_for_status()?;

    let envelope = match on_success {
        OnSuccess::Payload => Envelope::payload(response.json_value()?),
        OnSuccess::Message(message) => Envelope::message(message),
    };

    Ok(Json(envelope))
}

/// JSON body extractor whose rejections render as envelopes.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ClientJson<T>(pub T);

/// Read an id at JSON `pointer` (e.g. `/job_posting/id`) and encode it as a
/// path segment. Numbers and non-empty strings are accepted.
pub fn id_at(body: &Value, pointer: &str) -> ApiResult<String> {
    let field = pointer.trim_start_matches('/').replace('/', ".");
    match body.pointer(pointer) {
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(path_segment(s.trim())),
        _ => Err(ApiError::bad_request(format!("Missing {} in request body", field))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_id_at_accepts_numbers_and_strings() {
        let body = json!({"job_posting": {"id": 12}, "company": {"company_id": "7"}});
        assert_eq!(id_at(&body, "/job_posting/id").unwrap(), "12");
        assert_eq!(id_at(&body, "/company/company_id").unwrap(), "7");
    }

    #[test]
    fn test_id_at_encodes_strings() {
        let body = json!({"id": "../admin"});
        assert_eq!(id_at(&body, "/id").unwrap(), "..%2Fadmin");
    }

    #[test]
    fn test_id_at_rejects_missing_or_empty() {
        let body = json!({"id": "", "other": null});
        for pointer in ["/id", "/other", "/nope"] {
            match id_at(&body, pointer) {
                Err(ApiError::BadRequest(msg)) => assert!(msg.starts_with("Missing ")),
                other => panic!("unexpected: {:?}", other),
            }
        }
        match id_at(&json!({}), "/job_posting/id") {
            Err(ApiError::BadRequest(msg)) => {
                assert_eq!(msg, "Missing job_posting.id in request body")
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}
