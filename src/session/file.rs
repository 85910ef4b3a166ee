//! File-backed session storage.
//!
//! The credential is stored as `{"token": "..."}` so it survives restarts.
//! Other processes sharing the file are detected by polling: any difference
//! between the file and the value this context last wrote or observed is a
//! foreign change and is reported to subscribers.
//!
//! ERROR HANDLING
//! ==============
//! A missing, unreadable, or corrupt file reads as "no credential". Write
//! failures are logged; the store contract has no failure path. A value that
//! could not be persisted is kept in memory and served by `get` until the
//! next successful write or a foreign change to the file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::observers::ObserverSet;
use super::{Credential, SessionCallback, SessionStore, Subscription};

#[derive(Serialize, Deserialize)]
struct SessionFile {
    token: Option<Credential>,
}

/// What this context believes about the session.
#[derive(Default)]
struct LastSeen {
    /// File content as of the last own write or observed change.
    file: Option<Credential>,
    /// Own write that failed to reach the file.
    unpersisted: Option<Option<Credential>>,
}

/// Session store persisted to a JSON file.
pub struct FileSessionStore {
    path: PathBuf,
    poll_interval: Duration,
    last_seen: Arc<Mutex<LastSeen>>,
    observers: Arc<ObserverSet>,
    watcher: Mutex<Option<JoinHandle<()>>>,
}

impl FileSessionStore {
    /// Open the store at `path`. The file need not exist yet.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>, poll_interval: Duration) -> Self {
        let path = path.into();
        let current = read_token(&path);
        Self {
            path,
            poll_interval,
            last_seen: Arc::new(Mutex::new(LastSeen { file: current, unpersisted: None })),
            observers: Arc::new(ObserverSet::default()),
            watcher: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_watcher(&self) {
        let mut watcher = self.watcher.lock().unwrap_or_else(PoisonError::into_inner);
        if watcher.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return;
        }
        *watcher = Some(tokio::spawn(watch_file(
            self.path.clone(),
            self.poll_interval,
            Arc::clone(&self.last_seen),
            Arc::downgrade(&self.observers),
        )));
    }
}

impl Drop for FileSessionStore {
    fn drop(&mut self) {
        if let Some(handle) = self.watcher.get_mut().unwrap_or_else(PoisonError::into_inner).take() {
            handle.abort();
        }
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Option<Credential> {
        let last_seen = self.last_seen.lock().unwrap_or_else(PoisonError::into_inner);
        match &last_seen.unpersisted {
            Some(pending) => pending.clone(),
            None => read_token(&self.path),
        }
    }

    fn set(&self, credential: Credential) {
        let mut last_seen = self.last_seen.lock().unwrap_or_else(PoisonError::into_inner);
        match write_token(&self.path, &credential) {
            Ok(()) => {
                last_seen.file = Some(credential);
                last_seen.unpersisted = None;
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to persist session");
                last_seen.file = read_token(&self.path);
                last_seen.unpersisted = Some(Some(credential));
            }
        }
    }

    fn clear(&self) {
        let mut last_seen = self.last_seen.lock().unwrap_or_else(PoisonError::into_inner);
        let removed = match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        };
        match removed {
            Ok(()) => {
                last_seen.file = None;
                last_seen.unpersisted = None;
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to remove session");
                last_seen.file = read_token(&self.path);
                last_seen.unpersisted = Some(None);
            }
        }
    }

    fn subscribe(&self, callback: SessionCallback) -> Subscription {
        let subscription = self.observers.register(callback);
        self.ensure_watcher();
        subscription
    }
}

// =============================================================================
// FILE IO
// =============================================================================

fn read_token(path: &Path) -> Option<Credential> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return None,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read session");
            return None;
        }
    };
    parse_session(&raw)
}

fn parse_session(raw: &str) -> Option<Credential> {
    serde_json::from_str::<SessionFile>(raw)
        .ok()
        .and_then(|file| file.token)
        .filter(|token| !token.as_str().is_empty())
}

fn write_token(path: &Path, credential: &Credential) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let raw = serde_json::to_string(&SessionFile { token: Some(credential.clone()) })?;
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, raw)?;
    std::fs::rename(&tmp, path)
}

// =============================================================================
// WATCHER
// =============================================================================

async fn watch_file(
    path: PathBuf,
    poll_interval: Duration,
    last_seen: Arc<Mutex<LastSeen>>,
    observers: Weak<ObserverSet>,
) {
    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        ticker.tick().await;
        let Some(observers) = observers.upgrade() else { break };
        let changed = {
            let mut last = last_seen.lock().unwrap_or_else(PoisonError::into_inner);
            let current = read_token(&path);
            if last.file == current {
                None
            } else {
                last.file.clone_from(&current);
                last.unpersisted = None;
                Some(current)
            }
        };
        if let Some(current) = changed {
            tracing::debug!(path = %path.display(), "session file changed externally");
            observers.notify(current.as_ref());
        }
    }
}

#[cfg(test)]
#[path = "file_test.rs"]
mod tests;
