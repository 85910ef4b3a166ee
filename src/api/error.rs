//! Normalized API failure.

use serde_json::Value;

/// Message used when the request never produced an HTTP status.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error: unable to reach the server";

/// The one failure shape produced by [`super::ApiClient`].
///
/// `status` is `None` when no HTTP status was obtained (transport failure,
/// unbuildable URL, unserializable body).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
    pub status: Option<u16>,
}

impl ApiError {
    /// Error for a non-success response.
    ///
    /// Uses the body's `message` string when present, otherwise
    /// `HTTP <status>`.
    #[must_use]
    pub fn from_response(status: u16, body: &Value) -> Self {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.trim().is_empty())
            .map_or_else(|| fallback_message(status), str::to_owned);
        Self { message, status: Some(status) }
    }

    /// Error for a request that failed before a status arrived.
    #[must_use]
    pub fn network() -> Self {
        Self { message: NETWORK_ERROR_MESSAGE.to_owned(), status: None }
    }

    /// Error for a request that could not be constructed locally.
    #[must_use]
    pub fn invalid_request(detail: impl std::fmt::Display) -> Self {
        Self { message: format!("invalid request: {detail}"), status: None }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status == Some(401)
    }

    /// True for `401` and `403`, the statuses a front end answers by
    /// sending the user to the login page.
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        matches!(self.status, Some(401 | 403))
    }

    /// Stable machine-readable code for logs and front ends.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self.status {
            None => "E_NETWORK",
            Some(401) => "E_UNAUTHORIZED",
            Some(403) => "E_FORBIDDEN",
            Some(404) => "E_NOT_FOUND",
            Some(400..=499) => "E_CLIENT",
            Some(500..=599) => "E_SERVER",
            Some(_) => "E_HTTP",
        }
    }
}

fn fallback_message(status: u16) -> String {
    format!("HTTP {status}")
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
