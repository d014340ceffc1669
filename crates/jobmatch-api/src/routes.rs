//! API routes.

use std::sync::Arc;

use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, patch, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::timeout::TimeoutLayer;

use crate::error::ApiError;
use crate::guard::route_guard;
use crate::handlers::auth::{login, logout, register_recruiter, register_student, session_info};
use crate::handlers::catalog::{get_company, get_student, list_industries, list_skills};
use crate::handlers::job_postings::{
    apply, create_job_posting, get_job_posting, list_company_job_postings, list_job_postings,
    toggle_job_posting_active, update_job_posting,
};
use crate::handlers::messages::{get_conversation, list_partners, send_message};
use crate::handlers::notifications::list_notifications;
use crate::handlers::profile::{update_company_profile, update_student_profile};
use crate::handlers::{health, ready};
use crate::metrics::metrics_middleware;
use crate::middleware::{
    cors_layer, rate_limit_middleware, request_id, request_logging, security_headers,
    RateLimiterCache,
};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    // Token-bearing proxy routes, all behind the `/api/v1/auth/*` guard rule
    let auth_routes = Router::new()
        .route("/notification", get(list_notifications))
        .route("/apply", post(apply))
        .route("/message", post(send_message))
        .route("/message/partners", get(list_partners))
        .route("/message/:partner_id", get(get_conversation))
        .route(
            "/job-posting",
            get(list_company_job_postings)
                .post(create_job_posting)
                .patch(update_job_posting),
        )
        .route("/job-posting/change_active", post(toggle_job_posting_active))
        .route("/profile/company", patch(update_company_profile))
        .route("/profile/student", patch(update_student_profile));

    let session_routes = Router::new()
        .route("/logout", delete(logout))
        .route("/session", get(session_info))
        .route("/register", post(register_student))
        .route("/register/recruiter", post(register_recruiter));

    // Public pass-throughs, no token forwarded
    let public_routes = Router::new()
        .route("/job-postings", get(list_job_postings))
        .route("/job-postings/:id", get(get_job_posting))
        .route("/companies/:id", get(get_company))
        .route("/students/:id", get(get_student))
        .route("/skills", get(list_skills))
        .route("/industries", get(list_industries));

    let trust_proxy = state.config.trust_proxy_headers;
    let rate_limiter = Arc::new(
        RateLimiterCache::new(state.config.rate_limit_rps).trust_proxy_headers(trust_proxy),
    );

    // Stricter limiter for credential submission
    let login_rate_limiter = Arc::new(
        RateLimiterCache::new(state.config.login_rate_limit_rps).trust_proxy_headers(trust_proxy),
    );

    let login_routes = Router::new()
        .route("/login", post(login))
        .layer(middleware::from_fn_with_state(
            login_rate_limiter,
            rate_limit_middleware,
        ));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .merge(session_routes)
        .merge(public_routes)
        .layer(middleware::from_fn_with_state(
            rate_limiter,
            rate_limit_middleware,
        ))
        .merge(login_routes);

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/ready", get(ready));

    // Metrics endpoint (if enabled)
    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    let router = Router::new()
        .nest("/api/v1", api_routes)
        .merge(health_routes)
        .merge(metrics_routes);

    // Client bundle for everything else, or a JSON 404
    let router = match &state.config.static_dir {
        Some(dir) => {
            let index = ServeFile::new(dir.join("index.html"));
            router.fallback_service(ServeDir::new(dir).not_found_service(index))
        }
        None => router.fallback(not_found),
    };

    router
        // Guard sees every path, including the static fallback
        .layer(middleware::from_fn_with_state(state.clone(), route_guard))
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(TimeoutLayer::new(state.config.request_timeout))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_logging))
        .layer(middleware::from_fn(request_id))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}

async fn not_found() -> Response {
    ApiError::not_found("Not Found").into_response()
}
