//! Prometheus metrics for the API gateway.

use axum::body::Body;
use axum::extract::MatchedPath;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

/// Install the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "jobmatch_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "jobmatch_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "jobmatch_http_requests_in_flight";

    // Session metrics
    pub const GUARD_REJECTIONS_TOTAL: &str = "jobmatch_guard_rejections_total";
    pub const LOGIN_ATTEMPTS_TOTAL: &str = "jobmatch_login_attempts_total";

    // Rate limiting metrics
    pub const RATE_LIMIT_HITS_TOTAL: &str = "jobmatch_rate_limit_hits_total";
}

/// Label used for requests that matched no route (static bundle, 404s).
pub const UNMATCHED_ROUTE: &str = "unmatched";

/// Record an HTTP request. `route` is a route template, never a raw path.
pub fn record_http_request(method: &str, route: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", route.to_string()),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a request turned away by the route guard.
pub fn record_guard_rejection(reason: &str) {
    let labels = [("reason", reason.to_string())];
    counter!(names::GUARD_REJECTIONS_TOTAL, &labels).increment(1);
}

/// Record a login attempt outcome (`success`, `rejected`, `error`).
pub fn record_login(outcome: &str) {
    let labels = [("outcome", outcome.to_string())];
    counter!(names::LOGIN_ATTEMPTS_TOTAL, &labels).increment(1);
}

/// Record rate limit hit.
pub fn record_rate_limit_hit(endpoint: &str) {
    let labels = [("endpoint", endpoint.to_string())];
    counter!(names::RATE_LIMIT_HITS_TOTAL, &labels).increment(1);
}

/// Route template of the request (e.g. `/api/v1/job-postings/:id`), or
/// [`UNMATCHED_ROUTE`] when routing found nothing.
pub fn route_label<B>(request: &Request<B>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string())
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let route = route_label(&request);
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &route, status, duration);

    response
}
