//! Backend call metrics.

use metrics::{counter, histogram};

/// Metric name constants for consistency.
pub mod names {
    /// Total backend requests by operation and status.
    pub const REQUESTS_TOTAL: &str = "jobmatch_backend_requests_total";

    /// Backend request latency in seconds by operation.
    pub const LATENCY_SECONDS: &str = "jobmatch_backend_latency_seconds";
}

/// Record metrics for a completed backend call.
///
/// `status` is the backend HTTP status, or 0 when the call failed before
/// any response arrived.
pub fn record_request(operation: &str, status: u16, latency_secs: f64) {
    counter!(
        names::REQUESTS_TOTAL,
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        names::LATENCY_SECONDS,
        "operation" => operation.to_string()
    )
    .record(latency_secs);
}
