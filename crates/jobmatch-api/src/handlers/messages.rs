//! Direct message handlers.

use axum::extract::{Path, State};
use axum::Json;
use jobmatch_backend::path_segment;
use jobmatch_models::{BackendMessageRequest, Envelope, SendMessageRequest};

use crate::error::ApiResult;
use crate::proxy::{forward, ClientJson, OnSuccess};
use crate::session::SessionToken;
use crate::state::AppState;

/// Send a message to another user.
pub async fn send_message(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    ClientJson(request): ClientJson<SendMessageRequest>,
) -> ApiResult<Json<Envelope>> {
    let call = state
        .backend
        .post("/api/v1/messages")
        .bearer(&token)
        .json(&BackendMessageRequest::from(request))
        .operation("messages.send");
    forward(call, OnSuccess::Message("send message successfully")).await
}

/// List the users the current user has exchanged messages with.
pub async fn list_partners(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
) -> ApiResult<Json<Envelope>> {
    let call = state
        .backend
        .get("/api/v1/messages/partners")
        .bearer(&token)
        .operation("messages.partners");
    forward(call, OnSuccess::Payload).await
}

/// Conversation with one partner.
pub async fn get_conversation(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    Path(partner_id): Path<String>,
) -> ApiResult<Json<Envelope>> {
    let call = state
        .backend
        .get(format!(
            "/api/v1/messages/{}/conversation",
            path_segment(&partner_id)
        ))
        .bearer(&token)
        .operation("messages.conversation");
    forward(call, OnSuccess::Payload).await
}
