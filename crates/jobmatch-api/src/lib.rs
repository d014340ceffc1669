//! Axum API gateway for the JobMatch application.
//!
//! This crate provides:
//! - Cookie-backed sessions (`token` + `user` snapshot)
//! - A table-driven route guard
//! - Stateless proxy handlers in front of the backend REST service
//! - Rate limiting, security headers and Prometheus metrics

pub mod config;
pub mod error;
pub mod guard;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod proxy;
pub mod routes;
pub mod session;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use guard::{GuardConfig, GuardRule, OnReject, PathPattern, Requirement};
pub use routes::create_router;
pub use session::{CookiePolicy, CurrentUser, Session, SessionToken};
pub use state::AppState;
