//! Login, logout, registration and session snapshot.
//!
//! These are the only handlers that touch the session cookies.

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use jobmatch_models::{BackendLoginRequest, Envelope, LoginRequest, SessionUser};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::proxy::{forward, ClientJson, OnSuccess};
use crate::session::{end_session, start_session, CurrentUser, SessionToken};
use crate::state::AppState;

/// Body of a successful backend login.
#[derive(Debug, Deserialize)]
struct LoginResponseBody {
    user: SessionUser,
}

/// Log in and start a session.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ClientJson(request): ClientJson<LoginRequest>,
) -> ApiResult<(CookieJar, Json<Envelope>)> {
    let response = state
        .backend
        .post("/login")
        .json(&BackendLoginRequest::from(request))
        .operation("auth.login")
        .send()
        .await
        .inspect_err(|_| metrics::record_login("error"))?;

    let response = response
        .error_for_status()
        .inspect_err(|_| metrics::record_login("rejected"))?;

    let Some(token) = response.bearer_token() else {
        metrics::record_login("error");
        return Err(ApiError::MissingAuthToken);
    };

    let body: LoginResponseBody = response.json().map_err(|e| {
        metrics::record_login("error");
        ApiError::internal(format!("login response has no usable user: {}", e))
    })?;

    let jar = start_session(jar, &state.cookies, &token, &body.user)?;

    metrics::record_login("success");
    info!(user_id = body.user.id, role = %body.user.role, "User logged in");

    Ok((jar, Json(Envelope::message("Logged in successfully."))))
}

/// Log out at the backend, then clear the session cookies.
///
/// Cookies are cleared once the backend has answered, whatever the status.
/// If the backend cannot be reached the cookies are left in place.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    SessionToken(token): SessionToken,
) -> ApiResult<Response> {
    let response = state
        .backend
        .delete("/logout")
        .bearer(&token)
        .operation("auth.logout")
        .send()
        .await?;

    let jar = end_session(jar, &state.cookies);

    if response.is_success() {
        Ok((jar, Json(Envelope::message("Logged out successfully."))).into_response())
    } else {
        warn!(status = %response.status(), "Backend refused logout; clearing session anyway");
        let err = ApiError::upstream(response.status().as_u16(), response.text());
        Ok((jar, err).into_response())
    }
}

/// Register a student account.
pub async fn register_student(
    State(state): State<AppState>,
    ClientJson(body): ClientJson<Value>,
) -> ApiResult<Json<Envelope>> {
    let call = state
        .backend
        .post("/signup")
        .json(&body)
        .operation("auth.register_student");
    forward(call, OnSuccess::Message("Registered successfully.")).await
}

/// Register a recruiter together with their company.
pub async fn register_recruiter(
    State(state): State<AppState>,
    ClientJson(body): ClientJson<Value>,
) -> ApiResult<Json<Envelope>> {
    let call = state
        .backend
        .post("/companies/create_with_recruiter")
        .json(&body)
        .operation("auth.register_recruiter");
    forward(call, OnSuccess::Message("Registered successfully.")).await
}

/// Current session snapshot.
pub async fn session_info(current: CurrentUser) -> ApiResult<Json<Envelope>> {
    Ok(Json(Envelope::payload(serde_json::to_value(&current.user)?)))
}
