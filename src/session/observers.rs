//! Subscriber registry shared by the store implementations.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use super::Credential;

/// Callback invoked with the new credential (`None` when cleared).
pub type SessionCallback = Box<dyn Fn(Option<&Credential>) + Send + Sync + 'static>;

type SharedCallback = Arc<dyn Fn(Option<&Credential>) + Send + Sync + 'static>;

#[derive(Default)]
pub(crate) struct ObserverSet {
    inner: Mutex<Registry>,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    callbacks: HashMap<u64, SharedCallback>,
}

impl ObserverSet {
    pub(crate) fn register(self: &Arc<Self>, callback: SessionCallback) -> Subscription {
        let mut registry = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.callbacks.insert(id, Arc::from(callback));
        Subscription { observers: Arc::downgrade(self), id }
    }

    fn remove(&self, id: u64) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .callbacks
            .remove(&id);
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .callbacks
            .len()
    }

    /// Invoke every registered callback.
    ///
    /// Callbacks run outside the registry lock so they may subscribe or
    /// unsubscribe re-entrantly.
    pub(crate) fn notify(&self, credential: Option<&Credential>) {
        let callbacks: Vec<SharedCallback> = self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .callbacks
            .values()
            .cloned()
            .collect();
        tracing::debug!(subscribers = callbacks.len(), signed_in = credential.is_some(), "session change");
        for callback in callbacks {
            callback(credential);
        }
    }
}

/// Handle for a registered session callback.
///
/// Dropping the handle deregisters the callback, as does
/// [`Subscription::unsubscribe`].
#[must_use = "dropping a Subscription deregisters its callback"]
pub struct Subscription {
    observers: Weak<ObserverSet>,
    id: u64,
}

impl Subscription {
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(observers) = self.observers.upgrade() {
            observers.remove(self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
#[path = "observers_test.rs"]
mod tests;
