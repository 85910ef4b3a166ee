//! Credential persistence and cross-context change notification.
//!
//! SYSTEM CONTEXT
//! ==============
//! A [`SessionStore`] is the single owner of the bearer credential. The API
//! client reads it before every request; login, logout and auth-failure
//! handling write it. Several stores may share one backing storage (tabs
//! sharing `localStorage`, processes sharing a session file); a write in one
//! context is delivered asynchronously to subscribers of the others.
//!
//! IMPLEMENTATIONS
//! ===============
//! - [`MemorySessionStore`]: in-memory storage, shareable between contexts
//!   inside one process. Used by tests and embedders.
//! - [`FileSessionStore`]: JSON file on disk, polled for foreign writes.

mod file;
mod memory;
mod observers;

pub use file::FileSessionStore;
pub use memory::{MemorySessionStore, MemoryStorage};
pub use observers::{SessionCallback, Subscription};

use serde::{Deserialize, Serialize};

/// Key under which the credential is persisted.
pub const TOKEN_KEY: &str = "token";

// =============================================================================
// CREDENTIAL
// =============================================================================

/// Opaque bearer token identifying an authenticated session.
///
/// `Debug` output is redacted so credentials never reach logs.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header.
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

impl From<&str> for Credential {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for Credential {
    fn from(token: String) -> Self {
        Self(token)
    }
}

// =============================================================================
// STORE TRAIT
// =============================================================================

/// Owner of the current credential.
///
/// None of the operations fail: persistence problems are logged and the
/// store degrades to "no credential".
pub trait SessionStore: Send + Sync {
    /// Current credential, if any.
    fn get(&self) -> Option<Credential>;

    /// Persist `credential`, replacing any previous value.
    fn set(&self, credential: Credential);

    /// Remove the persisted credential. Clearing an empty store is a no-op.
    fn clear(&self);

    /// Register `callback` for credential changes made by *other* contexts
    /// sharing this store's storage.
    ///
    /// Delivery is asynchronous and best effort, from a Tokio task, so this
    /// must be called inside a Tokio runtime. Writes made through `self` are
    /// not reported back to `self`'s subscribers.
    fn subscribe(&self, callback: SessionCallback) -> Subscription;

    fn is_authenticated(&self) -> bool {
        self.get().is_some()
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
