//! Profile updates for companies and students.

use axum::extract::State;
use axum::Json;
use jobmatch_models::{Envelope, Role};
use serde_json::Value;
use tracing::warn;

use crate::error::{ApiError, ApiResult};
use crate::proxy::{forward, id_at, ClientJson, OnSuccess};
use crate::session::CurrentUser;
use crate::state::AppState;

/// Update the recruiter's company. The body's `company.company_id` must be
/// the company recorded in the session snapshot.
pub async fn update_company_profile(
    State(state): State<AppState>,
    current: CurrentUser,
    ClientJson(body): ClientJson<Value>,
) -> ApiResult<Json<Envelope>> {
    let company_id = id_at(&body, "/company/company_id")?;
    let owned = company_id
        .parse::<i64>()
        .map(|id| current.user.owns_company(id))
        .unwrap_or(false);
    if !owned {
        warn!(
            user_id = current.user.id,
            company_id = %company_id,
            "Rejected company update for a foreign company"
        );
        return Err(ApiError::forbidden("Forbidden"));
    }

    let call = state
        .backend
        .patch(format!("/companies/{}", company_id))
        .bearer(&current.token)
        .json(&body)
        .operation("companies.update");
    forward(call, OnSuccess::Message("Profile updated successfully")).await
}

/// Update the student's own profile.
pub async fn update_student_profile(
    State(state): State<AppState>,
    current: CurrentUser,
    ClientJson(body): ClientJson<Value>,
) -> ApiResult<Json<Envelope>> {
    if !current.user.has_role(Role::Student) {
        return Err(ApiError::forbidden("Forbidden"));
    }

    let call = state
        .backend
        .patch(format!("/api/v1/students/{}", current.user.id))
        .bearer(&current.token)
        .json(&body)
        .operation("students.update");
    forward(call, OnSuccess::Message("Profile updated successfully")).await
}
