//! Request handlers.

pub mod auth;
pub mod catalog;
pub mod health;
pub mod job_postings;
pub mod messages;
pub mod notifications;
pub mod profile;

pub use health::*;
