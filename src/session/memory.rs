//! In-memory session storage shared between contexts of one process.
//!
//! A [`MemoryStorage`] plays the role of browser `localStorage`: every
//! [`MemorySessionStore`] attached to it is one "tab". Writes are broadcast
//! tagged with the writer's context id, and each context's dispatcher task
//! forwards foreign writes to that context's subscribers.

use std::sync::{Arc, Mutex, PoisonError, Weak};

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::observers::ObserverSet;
use super::{Credential, SessionCallback, SessionStore, Subscription};

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
struct StorageEvent {
    origin: Uuid,
    credential: Option<Credential>,
}

struct StorageInner {
    value: Mutex<Option<Credential>>,
    events: broadcast::Sender<StorageEvent>,
}

impl StorageInner {
    fn read(&self) -> Option<Credential> {
        self.value.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

/// Shared backing storage for [`MemorySessionStore`] contexts.
#[derive(Clone)]
pub struct MemoryStorage {
    inner: Arc<StorageInner>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { inner: Arc::new(StorageInner { value: Mutex::new(None), events }) }
    }

    /// Open a new context over this storage.
    #[must_use]
    pub fn attach(&self) -> MemorySessionStore {
        MemorySessionStore {
            id: Uuid::new_v4(),
            storage: self.clone(),
            observers: Arc::new(ObserverSet::default()),
            dispatcher: Mutex::new(None),
        }
    }

    fn read(&self) -> Option<Credential> {
        self.inner.read()
    }

    fn write(&self, origin: Uuid, credential: Option<Credential>) {
        // Send under the value lock so event order matches store order.
        let mut value = self.inner.value.lock().unwrap_or_else(PoisonError::into_inner);
        value.clone_from(&credential);
        // No receivers just means no other context is listening.
        let _ = self.inner.events.send(StorageEvent { origin, credential });
        drop(value);
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

/// One execution context over a [`MemoryStorage`].
pub struct MemorySessionStore {
    id: Uuid,
    storage: MemoryStorage,
    observers: Arc<ObserverSet>,
    dispatcher: Mutex<Option<JoinHandle<()>>>,
}

impl MemorySessionStore {
    /// Standalone store with private storage.
    #[must_use]
    pub fn new() -> Self {
        MemoryStorage::new().attach()
    }

    /// Storage handle, for attaching sibling contexts.
    #[must_use]
    pub fn storage(&self) -> &MemoryStorage {
        &self.storage
    }

    fn ensure_dispatcher(&self) {
        let mut dispatcher = self.dispatcher.lock().unwrap_or_else(PoisonError::into_inner);
        if dispatcher.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return;
        }
        // Subscribe before returning so writes made right after `subscribe`
        // are not missed.
        let rx = self.storage.inner.events.subscribe();
        let storage = Arc::downgrade(&self.storage.inner);
        let observers = Arc::downgrade(&self.observers);
        *dispatcher = Some(tokio::spawn(dispatch(rx, self.id, storage, observers)));
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MemorySessionStore {
    fn drop(&mut self) {
        if let Some(handle) = self.dispatcher.get_mut().unwrap_or_else(PoisonError::into_inner).take() {
            handle.abort();
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Option<Credential> {
        self.storage.read()
    }

    fn set(&self, credential: Credential) {
        self.storage.write(self.id, Some(credential));
    }

    fn clear(&self) {
        self.storage.write(self.id, None);
    }

    fn subscribe(&self, callback: SessionCallback) -> Subscription {
        let subscription = self.observers.register(callback);
        self.ensure_dispatcher();
        subscription
    }
}

async fn dispatch(
    mut rx: broadcast::Receiver<StorageEvent>,
    context: Uuid,
    storage: Weak<StorageInner>,
    observers: Weak<ObserverSet>,
) {
    loop {
        let credential = match rx.recv().await {
            Ok(event) if event.origin == context => continue,
            Ok(event) => event.credential,
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                // Missed events; converge on whatever the storage holds now.
                tracing::warn!(skipped, "session dispatcher lagged");
                let Some(storage) = storage.upgrade() else { break };
                storage.read()
            }
            Err(broadcast::error::RecvError::Closed) => break,
        };
        let Some(observers) = observers.upgrade() else { break };
        observers.notify(credential.as_ref());
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;
