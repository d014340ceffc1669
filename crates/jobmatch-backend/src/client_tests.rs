//! Tests for the backend client against a mock server.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::client::{BackendClient, BackendConfig};
use crate::error::BackendError;

// =============================================================================
// Test Helpers
// =============================================================================

fn client_for(server: &MockServer) -> BackendClient {
    let mut config = BackendConfig::new(&server.uri()).unwrap();
    config.timeout = Duration::from_secs(5);
    BackendClient::new(config).unwrap()
}

// =============================================================================
// Request shape
// =============================================================================

#[tokio::test]
async fn test_bearer_and_content_type_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/notifications"))
        .and(header("authorization", "Bearer tok-1"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"notifications": [], "unread_count": 0})))
        .expect(1)
        .mount(&server)
        .await;

    let value = client_for(&server)
        .get("/api/v1/notifications")
        .bearer("tok-1")
        .operation("notifications.list")
        .send()
        .await
        .unwrap()
        .json_value()
        .unwrap();

    assert_eq!(value["unread_count"], 0);
}

#[tokio::test]
async fn test_json_body_is_forwarded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/messages"))
        .and(body_json(json!({"message": {"receiver_id": 3, "content": "hi"}})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server)
        .post("/api/v1/messages")
        .bearer("tok")
        .json(&json!({"message": {"receiver_id": 3, "content": "hi"}}))
        .send()
        .await
        .unwrap();

    assert!(response.is_success());
    assert_eq!(response.json_value().unwrap(), serde_json::Value::Null);
}

#[tokio::test]
async fn test_no_authorization_without_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/skills"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"skills": []})))
        .mount(&server)
        .await;

    client_for(&server).get("/api/v1/skills").send().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
}

// =============================================================================
// Responses
// =============================================================================

#[tokio::test]
async fn test_non_success_is_returned_not_raised() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/companies/9"))
        .respond_with(ResponseTemplate::new(403).set_body_string("not your company"))
        .mount(&server)
        .await;

    let response = client_for(&server)
        .patch("/companies/9")
        .bearer("tok")
        .json(&json!({}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 403);
    assert_eq!(response.text(), "not your company");
}

#[tokio::test]
async fn test_error_for_status_maps_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/job_postings/by_company"))
        .respond_with(ResponseTemplate::new(401).set_body_string("expired"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .get("/api/v1/job_postings/by_company")
        .bearer("old")
        .send()
        .await
        .unwrap()
        .error_for_status()
        .unwrap_err();

    assert!(matches!(err, BackendError::Status { status: 401, ref body } if body == "expired"));
    assert!(!err.is_transport());
}

#[tokio::test]
async fn test_malformed_json_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/industries"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .get("/api/v1/industries")
        .send()
        .await
        .unwrap()
        .json_value()
        .unwrap_err();

    assert!(matches!(err, BackendError::Json(_)));
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_authorization_header_is_exposed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("authorization", "Bearer abc123")
                .set_body_json(json!({"user": {"id": 1, "role": "student"}})),
        )
        .mount(&server)
        .await;

    let response = client_for(&server)
        .post("/login")
        .json(&json!({"user": {"email": "a@b.c", "password": "pw"}}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.bearer_token().as_deref(), Some("abc123"));
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let client = BackendClient::new(BackendConfig::new("http://127.0.0.1:1").unwrap()).unwrap();
    let err = client.get("/api/v1/skills").send().await.unwrap_err();
    assert!(matches!(err, BackendError::Network(_)));
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_ping_accepts_any_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    assert_eq!(client_for(&server).ping().await.unwrap(), 404);
}
