//! Notification handlers.

use axum::extract::State;
use axum::Json;
use jobmatch_models::Envelope;

use crate::error::ApiResult;
use crate::proxy::{forward, OnSuccess};
use crate::session::SessionToken;
use crate::state::AppState;

/// List the current user's notifications.
pub async fn list_notifications(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
) -> ApiResult<Json<Envelope>> {
    let call = state
        .backend
        .get("/api/v1/notifications")
        .bearer(&token)
        .operation("notifications.list");
    forward(call, OnSuccess::Payload).await
}
