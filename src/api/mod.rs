//! REST client for the Lumina backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `client` owns the single `request` path every call goes through,
//! `operations` binds the fixed endpoint catalog onto it, `request` defines
//! the per-call descriptor, and `types` holds the JSON request bodies.
//!
//! ERROR HANDLING
//! ==============
//! Every failure, transport or HTTP status, surfaces as exactly one
//! [`ApiError`]. Nothing is retried or swallowed here; callers decide how to
//! present the message.

pub mod client;
pub mod error;
pub mod operations;
pub mod request;
pub mod types;

pub use client::ApiClient;
pub use error::ApiError;
pub use request::RequestDescriptor;
