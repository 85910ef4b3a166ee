//! Local HTTP server for exercising the client end to end.
//!
//! Responses are canned per `(method, path)`; every request is recorded so
//! tests can assert on headers and bodies, or on the absence of traffic.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use tokio::task::JoinHandle;

use crate::api::ApiClient;
use crate::config::{AuthFailurePolicy, ClientConfig};
use crate::session::SessionStore;

#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

impl RecordedRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

#[derive(Clone)]
struct Canned {
    status: u16,
    body: String,
}

#[derive(Default)]
struct ServerState {
    routes: Mutex<HashMap<(String, String), Canned>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

pub(crate) struct TestServer {
    addr: SocketAddr,
    state: Arc<ServerState>,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        let state = Arc::new(ServerState::default());
        let app = Router::new().fallback(handle).with_state(Arc::clone(&state));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self { addr, state, handle }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Answer `method path` with `status` and a raw `body`.
    pub fn respond(&self, method: &str, path: &str, status: u16, body: &str) -> &Self {
        self.state
            .routes
            .lock()
            .unwrap()
            .insert((method.to_owned(), path.to_owned()), Canned { status, body: body.to_owned() });
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn client(&self, session: Arc<dyn SessionStore>) -> ApiClient {
        self.client_with_policy(session, AuthFailurePolicy::ClearSession)
    }

    pub fn client_with_policy(&self, session: Arc<dyn SessionStore>, policy: AuthFailurePolicy) -> ApiClient {
        let mut config = ClientConfig::new(&self.url());
        config.auth_failure_policy = policy;
        ApiClient::new(&config, session).unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn handle(
    State(state): State<Arc<ServerState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header_str = |name: header::HeaderName| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_owned);
    state.requests.lock().unwrap().push(RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_owned(),
        query: uri.query().map(str::to_owned),
        authorization: header_str(header::AUTHORIZATION),
        content_type: header_str(header::CONTENT_TYPE),
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    let canned = state
        .routes
        .lock()
        .unwrap()
        .get(&(method.to_string(), uri.path().to_owned()))
        .cloned();
    match canned {
        Some(canned) => (
            StatusCode::from_u16(canned.status).unwrap(),
            [(header::CONTENT_TYPE, "application/json")],
            canned.body,
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "application/json")],
            r#"{"message":"no route"}"#.to_owned(),
        )
            .into_response(),
    }
}
