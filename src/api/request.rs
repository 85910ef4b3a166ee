//! Per-call request descriptor.

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use super::ApiError;

/// One outbound call: method, path under the base URL, optional dynamic
/// path segments, query pairs, and optional JSON body.
///
/// The credential is not part of the descriptor; the client attaches it to
/// every request when one is present.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    method: Method,
    path: String,
    segments: Vec<String>,
    query: Vec<(String, String)>,
    body: Option<Value>,
}

impl RequestDescriptor {
    #[must_use]
    pub fn new(method: Method, path: &str) -> Self {
        Self { method, path: path.to_owned(), segments: Vec::new(), query: Vec::new(), body: None }
    }

    #[must_use]
    pub fn get(path: &str) -> Self {
        Self::new(Method::GET, path)
    }

    #[must_use]
    pub fn post(path: &str) -> Self {
        Self::new(Method::POST, path)
    }

    #[must_use]
    pub fn put(path: &str) -> Self {
        Self::new(Method::PUT, path)
    }

    #[must_use]
    pub fn delete(path: &str) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append a path segment. It is percent-encoded when the URL is built,
    /// so ids containing `/` or `?` stay one segment.
    #[must_use]
    pub fn segment(mut self, raw: impl Into<String>) -> Self {
        self.segments.push(raw.into());
        self
    }

    #[must_use]
    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_owned(), value.into()));
        self
    }

    #[must_use]
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Attach `body` serialized as JSON.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] without status if `body` cannot be represented
    /// as JSON.
    pub fn json<T: Serialize + ?Sized>(self, body: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(ApiError::invalid_request)?;
        Ok(self.body(value))
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Static path, without dynamic segments or query.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    #[must_use]
    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    #[must_use]
    pub fn body_json(&self) -> Option<&Value> {
        self.body.as_ref()
    }
}

#[cfg(test)]
#[path = "request_test.rs"]
mod tests;
