use std::time::Duration;

use super::*;
use crate::session::{Credential, MemorySessionStore, MemoryStorage};

#[test]
fn should_redirect_unauth_when_signed_out() {
    assert!(should_redirect_unauth(&AuthState { authenticated: false }));
    assert!(!should_redirect_unauth(&AuthState { authenticated: true }));
}

#[test]
fn access_only_guards_protected_views() {
    let anonymous = AuthState::default();
    let signed_in = AuthState { authenticated: true };
    assert_eq!(Access::check(true, &anonymous), Access::RedirectToLogin);
    assert_eq!(Access::check(false, &anonymous), Access::Allow);
    assert_eq!(Access::check(true, &signed_in), Access::Allow);
}

#[test]
fn nav_links_follow_auth_state() {
    let anonymous = nav_links(&AuthState::default());
    assert!(anonymous.contains(&NavLink::Login));
    assert!(anonymous.contains(&NavLink::Signup));
    assert!(!anonymous.contains(&NavLink::Logout));

    let signed_in = nav_links(&AuthState { authenticated: true });
    assert!(signed_in.contains(&NavLink::Profile));
    assert!(signed_in.contains(&NavLink::Logout));
    assert!(signed_in.contains(&NavLink::Favorites));
    assert!(!signed_in.contains(&NavLink::Login));

    for links in [anonymous, signed_in] {
        assert!(links.contains(&NavLink::About));
    }
}

#[test]
fn nav_link_paths() {
    assert_eq!(NavLink::Login.path(), Some(LOGIN_PATH));
    assert_eq!(NavLink::Videos.path(), Some("/pexels"));
    assert_eq!(NavLink::Logout.path(), None);
    assert_eq!(NavLink::Signup.label(), "Sign up");
}

#[test]
fn from_store_reflects_credential() {
    let store = MemorySessionStore::new();
    assert!(!AuthState::from_store(&store).authenticated);
    store.set(Credential::from("T"));
    assert!(AuthState::from_store(&store).authenticated);
}

#[tokio::test]
async fn watcher_follows_other_context() {
    let storage = MemoryStorage::new();
    let this_tab: Arc<dyn SessionStore> = Arc::new(storage.attach());
    let other_tab = storage.attach();
    let watcher = AuthWatcher::new(this_tab);
    let mut changes = watcher.changes();
    assert!(!watcher.state().authenticated);

    other_tab.set(Credential::from("T"));
    tokio::time::timeout(Duration::from_secs(1), changes.changed()).await.unwrap().unwrap();
    assert!(changes.borrow_and_update().authenticated);

    other_tab.clear();
    tokio::time::timeout(Duration::from_secs(1), changes.changed()).await.unwrap().unwrap();
    assert!(!watcher.state().authenticated);
}

#[tokio::test]
async fn refresh_picks_up_own_writes() {
    let store = Arc::new(MemorySessionStore::new());
    let watcher = AuthWatcher::new(store.clone());

    store.set(Credential::from("T"));
    assert!(!watcher.state().authenticated);

    watcher.refresh();
    assert!(watcher.state().authenticated);
}
