//! The shared request path.
//!
//! Thin wrapper over `reqwest`: attach the bearer credential, send JSON,
//! read JSON, normalize failures. Pure helpers (`build_url`, `parse_body`)
//! are kept free of IO for testability.

use std::sync::Arc;

use reqwest::Url;
use reqwest::header::AUTHORIZATION;
use serde_json::{Map, Value};

use super::{ApiError, RequestDescriptor};
use crate::config::{AuthFailurePolicy, ClientConfig, ConfigError};
use crate::session::{Credential, SessionStore};

// =============================================================================
// CLIENT
// =============================================================================

/// Session-aware client for the Lumina backend.
///
/// Cheap to clone: clones share the connection pool and the session store.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<dyn SessionStore>,
    auth_failure_policy: AuthFailurePolicy,
}

impl ApiClient {
    /// Build a client for `config`, reading credentials from `session`.
    ///
    /// No request timeout is set; calls run until the transport gives up.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClientBuild`] if the HTTP client cannot be
    /// constructed.
    pub fn new(config: &ClientConfig, session: Arc<dyn SessionStore>) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ConfigError::HttpClientBuild(e.to_string()))?;
        Ok(Self::with_http(http, config, session))
    }

    /// Build a client around an existing `reqwest::Client`.
    #[must_use]
    pub fn with_http(http: reqwest::Client, config: &ClientConfig, session: Arc<dyn SessionStore>) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            session,
            auth_failure_policy: config.auth_failure_policy,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    /// Issue one request and return its parsed JSON body.
    ///
    /// The current credential, if any, is sent as `Authorization: Bearer`.
    /// An empty or non-JSON body parses as `{}`. Each call is independent:
    /// no retries, no caching.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] for a status outside 200–299 (message taken
    /// from the body's `message` field, else `HTTP <status>`), for transport
    /// failures, and for requests that cannot be built.
    pub async fn request(&self, descriptor: &RequestDescriptor) -> Result<Value, ApiError> {
        let url = build_url(&self.base_url, descriptor)?;
        let credential = self.session.get();

        let mut builder = self.http.request(descriptor.method().clone(), url);
        if let Some(credential) = &credential {
            builder = builder.header(AUTHORIZATION, credential.bearer());
        }
        if let Some(body) = descriptor.body_json() {
            builder = builder.json(body);
        }

        tracing::debug!(
            method = %descriptor.method(),
            path = descriptor.path(),
            authenticated = credential.is_some(),
            "api request"
        );

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(method = %descriptor.method(), path = descriptor.path(), error = %e, "api request failed");
            if e.is_builder() { ApiError::invalid_request(e) } else { ApiError::network() }
        })?;

        let status = response.status().as_u16();
        let body = match response.bytes().await {
            Ok(raw) => parse_body(&raw),
            Err(e) => {
                tracing::debug!(status, error = %e, "api response body unreadable");
                parse_body(&[])
            }
        };

        if (200..300).contains(&status) {
            return Ok(body);
        }

        let err = ApiError::from_response(status, &body);
        tracing::warn!(
            method = %descriptor.method(),
            path = descriptor.path(),
            status,
            code = err.error_code(),
            "api error response"
        );
        if status == 401 {
            self.handle_unauthorized(credential.as_ref());
        }
        Err(err)
    }

    /// Drop a credential the server just rejected, unless another context
    /// replaced it while the request was in flight.
    fn handle_unauthorized(&self, sent: Option<&Credential>) {
        if self.auth_failure_policy != AuthFailurePolicy::ClearSession {
            return;
        }
        let Some(sent) = sent else { return };
        if self.session.get().as_ref() == Some(sent) {
            tracing::info!("credential rejected; clearing session");
            self.session.clear();
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("auth_failure_policy", &self.auth_failure_policy)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn build_url(base_url: &str, descriptor: &RequestDescriptor) -> Result<Url, ApiError> {
    let mut url = Url::parse(&format!("{base_url}{}", descriptor.path())).map_err(ApiError::invalid_request)?;
    if !descriptor.segments().is_empty() {
        let mut segments = url
            .path_segments_mut()
            .map_err(|()| ApiError::invalid_request("base URL cannot carry a path"))?;
        segments.pop_if_empty().extend(descriptor.segments());
    }
    if !descriptor.query_pairs().is_empty() {
        url.query_pairs_mut().extend_pairs(descriptor.query_pairs());
    }
    Ok(url)
}

fn parse_body(raw: &[u8]) -> Value {
    serde_json::from_slice(raw).unwrap_or_else(|_| Value::Object(Map::new()))
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
