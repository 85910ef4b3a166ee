use std::sync::Arc;

use super::*;
use crate::session::{MemorySessionStore, SessionStore};
use crate::test_support::TestServer;

fn session() -> Arc<MemorySessionStore> {
    Arc::new(MemorySessionStore::new())
}

// =============================================================================
// AUTH
// =============================================================================

#[tokio::test]
async fn login_stores_returned_token() {
    let server = TestServer::start().await;
    server.respond("POST", LOGIN_PATH, 200, r#"{"token":"T","user":{"email":"a@b.com"}}"#);
    let store = session();
    let client = server.client(store.clone());

    let body = client.login("a@b.com", "pw").await.unwrap();

    assert_eq!(store.get(), Some(Credential::from("T")));
    assert_eq!(body["user"]["email"], "a@b.com");
    let recorded = &server.requests()[0];
    assert_eq!(recorded.method, "POST");
    assert_eq!(recorded.json(), json!({ "email": "a@b.com", "password": "pw" }));
    assert_eq!(recorded.authorization, None);
}

#[tokio::test]
async fn login_then_requests_carry_token() {
    let server = TestServer::start().await;
    server
        .respond("POST", LOGIN_PATH, 200, r#"{"token":"T"}"#)
        .respond("GET", ME_PATH, 200, r#"{"firstName":"Ana"}"#);
    let client = server.client(session());

    client.login("a@b.com", "pw").await.unwrap();
    let me = client.me().await.unwrap();

    assert_eq!(me["firstName"], "Ana");
    assert_eq!(server.requests()[1].authorization.as_deref(), Some("Bearer T"));
}

#[tokio::test]
async fn failed_login_leaves_session_alone() {
    let server = TestServer::start().await;
    server.respond("POST", LOGIN_PATH, 401, r#"{"message":"Invalid credentials"}"#);
    let store = session();
    let client = server.client(store.clone());

    let err = client.login("a@b.com", "bad").await.unwrap_err();

    assert_eq!(err.message, "Invalid credentials");
    assert_eq!(store.get(), None);
}

#[tokio::test]
async fn login_without_token_does_not_sign_in() {
    let server = TestServer::start().await;
    server.respond("POST", LOGIN_PATH, 200, r#"{"ok":true}"#);
    let store = session();
    let client = server.client(store.clone());

    client.login("a@b.com", "pw").await.unwrap();

    assert_eq!(store.get(), None);
}

#[tokio::test]
async fn logout_clears_without_network() {
    let server = TestServer::start().await;
    let store = session();
    store.set(Credential::from("T"));
    let client = server.client(store.clone());

    let ack = client.logout();
    client.logout();

    assert_eq!(ack, json!({ "ok": true }));
    assert_eq!(store.get(), None);
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn password_flows_hit_expected_endpoints() {
    let server = TestServer::start().await;
    server
        .respond("POST", FORGOT_PATH, 200, r#"{"message":"If the email exists, a link was sent"}"#)
        .respond("POST", RESET_PATH, 200, "")
        .respond("PUT", PASSWORD_PATH, 200, "");
    let client = server.client(session());

    client.forgot_password("a@b.com").await.unwrap();
    client.reset_password("reset-token", "N3w!pass", "N3w!pass").await.unwrap();
    client.change_password("old", "newpass", "newpass").await.unwrap();

    let requests = server.requests();
    assert_eq!(requests[0].json(), json!({ "email": "a@b.com" }));
    assert_eq!(
        requests[1].json(),
        json!({ "token": "reset-token", "password": "N3w!pass", "confirmPassword": "N3w!pass" })
    );
    assert_eq!((requests[2].method.as_str(), requests[2].path.as_str()), ("PUT", PASSWORD_PATH));
    assert_eq!(
        requests[2].json(),
        json!({ "currentPassword": "old", "newPassword": "newpass", "confirmPassword": "newpass" })
    );
}

// =============================================================================
// PROFILE
// =============================================================================

#[tokio::test]
async fn profile_update_and_delete() {
    let server = TestServer::start().await;
    server
        .respond("PUT", ME_PATH, 200, r#"{"firstName":"Ana","age":31}"#)
        .respond("DELETE", ME_PATH, 204, "");
    let client = server.client(session());

    let update = ProfileUpdate {
        first_name: "Ana".to_owned(),
        last_name: "Diaz".to_owned(),
        age: 31,
        email: "ana@lumina.test".to_owned(),
    };
    let updated = client.update_me(&update).await.unwrap();
    let deleted = client.delete_me().await.unwrap();

    assert_eq!(updated["age"], 31);
    assert_eq!(deleted, json!({}));
    let requests = server.requests();
    assert_eq!(
        requests[0].json(),
        json!({ "firstName": "Ana", "lastName": "Diaz", "age": 31, "email": "ana@lumina.test" })
    );
    assert_eq!(requests[1].method, "DELETE");
    assert_eq!(requests[1].body, "");
}

// =============================================================================
// CATALOG
// =============================================================================

#[tokio::test]
async fn search_sends_query_parameters() {
    let server = TestServer::start().await;
    server.respond("GET", SEARCH_VIDEOS_PATH, 200, r#"{"videos":[],"total_results":0,"page":1}"#);
    let client = server.client(session());

    let body = client
        .search_videos(&VideoSearch::query("sea turtles").with_terms("ocean").per_page(5))
        .await
        .unwrap();

    assert_eq!(body["total_results"], 0);
    assert_eq!(server.requests()[0].query.as_deref(), Some("query=sea+turtles&terms=ocean&per_page=5"));
}

#[tokio::test]
async fn video_detail_and_popular() {
    let server = TestServer::start().await;
    server
        .respond("GET", "/api/pexels/videos/1234", 200, r#"{"id":1234}"#)
        .respond("GET", POPULAR_VIDEOS_PATH, 200, r#"[{"id":1}]"#)
        .respond("GET", CATALOG_HEALTH_PATH, 200, r#"{"status":"ok"}"#);
    let client = server.client(session());

    assert_eq!(client.video("1234").await.unwrap()["id"], 1234);
    assert_eq!(client.popular_videos().await.unwrap()[0]["id"], 1);
    assert_eq!(client.catalog_health().await.unwrap()["status"], "ok");
}

// =============================================================================
// FAVORITES
// =============================================================================

#[tokio::test]
async fn favorites_round_trip_endpoints() {
    let server = TestServer::start().await;
    server
        .respond("GET", FAVORITES_PATH, 200, "[]")
        .respond("POST", FAVORITES_PATH, 201, r#"{"id":"42"}"#)
        .respond("DELETE", "/api/favorites/42", 200, "");
    let store = session();
    store.set(Credential::from("T"));
    let client = server.client(store);

    let favorite = Favorite {
        id: "42".to_owned(),
        title: "Waves".to_owned(),
        url: "https://videos.test/42".to_owned(),
        thumbnail: "https://images.test/42.jpg".to_owned(),
    };
    assert_eq!(client.favorites().await.unwrap(), json!([]));
    client.add_favorite(&favorite).await.unwrap();
    client.remove_favorite("42").await.unwrap();

    let requests = server.requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(
        requests[1].json(),
        json!({
            "id": "42",
            "title": "Waves",
            "url": "https://videos.test/42",
            "thumbnail": "https://images.test/42.jpg"
        })
    );
    assert_eq!((requests[2].method.as_str(), requests[2].path.as_str()), ("DELETE", "/api/favorites/42"));
    assert!(requests.iter().all(|r| r.authorization.as_deref() == Some("Bearer T")));
}

#[tokio::test]
async fn remove_favorite_surfaces_server_error() {
    let server = TestServer::start().await;
    server.respond("DELETE", "/api/favorites/missing", 404, r#"{"message":"Favorite not found"}"#);
    let client = server.client(session());

    let err = client.remove_favorite("missing").await.unwrap_err();

    assert_eq!(err.message, "Favorite not found");
}
