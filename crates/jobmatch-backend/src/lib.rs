//! REST client for the JobMatch backend service.
//!
//! This crate provides:
//! - Environment-driven client configuration
//! - Bearer-token propagation on a per-call basis (no cached credentials)
//! - Raw response access for handlers that inspect headers (login)
//! - Error taxonomy separating transport failures from backend rejections
//! - Request metrics by operation

pub mod client;
pub mod error;
pub mod metrics;

#[cfg(test)]
mod client_tests;

pub use client::{path_segment, BackendCall, BackendClient, BackendConfig, BackendResponse, Method};
pub use error::{BackendError, BackendResult};
