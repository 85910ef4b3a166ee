//! Auth state for the current user, shared by route guards and navigation.
//!
//! SYSTEM CONTEXT
//! ==============
//! Authentication is "a credential is present in the session store". The
//! [`AuthWatcher`] keeps a `watch` channel in step with the store: foreign
//! writes arrive through the store subscription, same-context login/logout
//! through [`AuthWatcher::refresh`]. Observers must treat the value as
//! eventually consistent.

use std::sync::Arc;

use tokio::sync::watch;

use crate::session::{SessionStore, Subscription};

pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthState {
    pub authenticated: bool,
}

impl AuthState {
    #[must_use]
    pub fn from_store(store: &dyn SessionStore) -> Self {
        Self { authenticated: store.is_authenticated() }
    }
}

/// True when a protected view should send the user to [`LOGIN_PATH`].
#[must_use]
pub fn should_redirect_unauth(state: &AuthState) -> bool {
    !state.authenticated
}

/// Guard decision for a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    RedirectToLogin,
}

impl Access {
    #[must_use]
    pub fn check(protected: bool, state: &AuthState) -> Self {
        if protected && should_redirect_unauth(state) { Self::RedirectToLogin } else { Self::Allow }
    }
}

// =============================================================================
// NAVIGATION
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavLink {
    Home,
    About,
    Videos,
    Favorites,
    Login,
    Signup,
    Profile,
    Logout,
}

impl NavLink {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::About => "About",
            Self::Videos => "Videos",
            Self::Favorites => "Favorites",
            Self::Login => "Login",
            Self::Signup => "Sign up",
            Self::Profile => "Profile",
            Self::Logout => "Logout",
        }
    }

    /// Target path; `Logout` is an action, not a view.
    #[must_use]
    pub fn path(self) -> Option<&'static str> {
        match self {
            Self::Home => Some("/"),
            Self::About => Some("/about"),
            Self::Videos => Some("/pexels"),
            Self::Favorites => Some("/favorites"),
            Self::Login => Some(LOGIN_PATH),
            Self::Signup => Some("/signup"),
            Self::Profile => Some("/profile"),
            Self::Logout => None,
        }
    }
}

/// Navigation entries visible in `state`, in display order.
#[must_use]
pub fn nav_links(state: &AuthState) -> Vec<NavLink> {
    if state.authenticated {
        vec![NavLink::About, NavLink::Videos, NavLink::Favorites, NavLink::Profile, NavLink::Logout]
    } else {
        vec![NavLink::Home, NavLink::About, NavLink::Login, NavLink::Signup]
    }
}

// =============================================================================
// WATCHER
// =============================================================================

/// Live [`AuthState`] derived from a session store.
pub struct AuthWatcher {
    session: Arc<dyn SessionStore>,
    state: Arc<watch::Sender<AuthState>>,
    _subscription: Subscription,
}

impl AuthWatcher {
    /// Seed from the store and follow changes made by other contexts.
    ///
    /// Must be called inside a Tokio runtime.
    #[must_use]
    pub fn new(session: Arc<dyn SessionStore>) -> Self {
        let state = Arc::new(watch::Sender::new(AuthState::from_store(session.as_ref())));
        let sink = Arc::clone(&state);
        let subscription = session.subscribe(Box::new(move |credential| {
            publish(&sink, AuthState { authenticated: credential.is_some() });
        }));
        Self { session, state, _subscription: subscription }
    }

    #[must_use]
    pub fn state(&self) -> AuthState {
        *self.state.borrow()
    }

    #[must_use]
    pub fn changes(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Re-read the store after a same-context login or logout, which the
    /// store does not report back to its own subscribers.
    pub fn refresh(&self) {
        publish(&self.state, AuthState::from_store(self.session.as_ref()));
    }
}

fn publish(state: &watch::Sender<AuthState>, next: AuthState) {
    let changed = state.send_if_modified(|current| {
        if *current == next {
            return false;
        }
        *current = next;
        true
    });
    if changed {
        tracing::debug!(authenticated = next.authenticated, "auth state changed");
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
