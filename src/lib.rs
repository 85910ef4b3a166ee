//! Lumina client core.
//!
//! SYSTEM CONTEXT
//! ==============
//! Front ends (the `lumina` binary, or any other shell) call named operations
//! on [`api::ApiClient`]. The client reads the bearer credential from an
//! injected [`session::SessionStore`], and login/logout/401 handling write it
//! back. Other execution contexts sharing the same storage observe those
//! writes through store subscriptions, which [`auth::AuthWatcher`] turns into
//! route-guard and navigation state.
//!
//! Form-level rules live in [`actions`] so local validation failures never
//! reach the network layer.

pub mod actions;
pub mod api;
pub mod auth;
pub mod config;
pub mod session;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;

pub use api::{ApiClient, ApiError, RequestDescriptor};
pub use config::{AuthFailurePolicy, ClientConfig, ConfigError};
pub use session::{Credential, SessionStore, Subscription};
