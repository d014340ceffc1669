//! Job posting handlers.
//!
//! Listing and detail views are public; management and applying require a
//! session.

use axum::extract::{Path, State};
use axum::Json;
use jobmatch_backend::path_segment;
use jobmatch_models::Envelope;
use serde_json::{json, Value};

use crate::error::ApiResult;
use crate::proxy::{forward, id_at, ClientJson, OnSuccess};
use crate::session::SessionToken;
use crate::state::AppState;

/// All postings.
pub async fn list_job_postings(State(state): State<AppState>) -> ApiResult<Json<Envelope>> {
    let call = state
        .backend
        .get("/api/v1/job_postings")
        .operation("job_postings.list");
    forward(call, OnSuccess::Payload).await
}

/// One posting.
pub async fn get_job_posting(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope>> {
    let call = state
        .backend
        .get(format!("/api/v1/job_postings/{}", path_segment(&id)))
        .operation("job_postings.get");
    forward(call, OnSuccess::Payload).await
}

/// Postings of the recruiter's company.
pub async fn list_company_job_postings(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
) -> ApiResult<Json<Envelope>> {
    let call = state
        .backend
        .get("/api/v1/job_postings/by_company")
        .bearer(&token)
        .operation("job_postings.by_company");
    forward(call, OnSuccess::Payload).await
}

pub async fn create_job_posting(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    ClientJson(body): ClientJson<Value>,
) -> ApiResult<Json<Envelope>> {
    let call = state
        .backend
        .post("/api/v1/job_postings")
        .bearer(&token)
        .json(&body)
        .operation("job_postings.create");
    forward(call, OnSuccess::Message("Job posting created successfully")).await
}

/// Update a posting; the id comes from `job_posting.id`.
pub async fn update_job_posting(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    ClientJson(body): ClientJson<Value>,
) -> ApiResult<Json<Envelope>> {
    let id = id_at(&body, "/job_posting/id")?;
    let call = state
        .backend
        .patch(format!("/api/v1/job_postings/{}", id))
        .bearer(&token)
        .json(&body)
        .operation("job_postings.update");
    forward(call, OnSuccess::Message("Job posting updated successfully")).await
}

/// Flip a posting's active flag; the body is forwarded as sent.
pub async fn toggle_job_posting_active(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    ClientJson(body): ClientJson<Value>,
) -> ApiResult<Json<Envelope>> {
    let id = id_at(&body, "/id")?;
    let call = state
        .backend
        .post(format!("/api/v1/job_postings/{}/toggle_active", id))
        .bearer(&token)
        .json(&body)
        .operation("job_postings.toggle_active");
    forward(call, OnSuccess::Message("Changing active status successfully")).await
}

/// Apply to a posting as a student. The client sends `{id}` with the id as
/// a number or as the route string.
pub async fn apply(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    ClientJson(body): ClientJson<Value>,
) -> ApiResult<Json<Envelope>> {
    let id = id_at(&body, "/id")?;
    let call = state
        .backend
        .post(format!("/api/v1/job_postings/{}/apply", id))
        .bearer(&token)
        .json(&json!({ "message": state.config.apply_message }))
        .operation("job_postings.apply");
    forward(call, OnSuccess::Message("apply is success!!")).await
}
