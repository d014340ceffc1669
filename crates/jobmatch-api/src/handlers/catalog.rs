//! Public read-only pass-throughs. No token is sent.

use axum::extract::{Path, State};
use axum::Json;
use jobmatch_backend::path_segment;
use jobmatch_models::Envelope;

use crate::error::ApiResult;
use crate::proxy::{forward, OnSuccess};
use crate::state::AppState;

pub async fn list_skills(State(state): State<AppState>) -> ApiResult<Json<Envelope>> {
    let call = state.backend.get("/api/v1/skills").operation("skills.list");
    forward(call, OnSuccess::Payload).await
}

pub async fn list_industries(State(state): State<AppState>) -> ApiResult<Json<Envelope>> {
    let call = state
        .backend
        .get("/api/v1/industries")
        .operation("industries.list");
    forward(call, OnSuccess::Payload).await
}

/// Company detail, including its postings.
pub async fn get_company(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope>> {
    let call = state
        .backend
        .get(format!("/companies/{}", path_segment(&id)))
        .operation("companies.get");
    forward(call, OnSuccess::Payload).await
}

pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope>> {
    let call = state
        .backend
        .get(format!("/api/v1/students/{}", path_segment(&id)))
        .operation("students.get");
    forward(call, OnSuccess::Payload).await
}
