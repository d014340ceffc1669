//! Shared data models for the JobMatch gateway.
//!
//! This crate provides Serde-serializable types for:
//! - The session user snapshot stored in the `user` cookie
//! - The client-facing response envelope
//! - Request payloads accepted by the gateway

pub mod envelope;
pub mod requests;
pub mod user;

// Re-export common types
pub use envelope::Envelope;
pub use requests::{
    BackendCredentials, BackendLoginRequest, BackendMessage, BackendMessageRequest, LoginRequest,
    SendMessageRequest,
};
pub use user::{Role, SessionUser};
