//! JSON request bodies for the backend's endpoints.
//!
//! Field names follow the backend's camelCase wire format. Responses are
//! passed through untyped (`serde_json::Value`): their shape is owned by the
//! backend and the catalog provider behind it.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PER_PAGE: u32 = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirm_password: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ForgotRequest<'a> {
    pub email: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ResetRequest<'a> {
    pub token: &'a str,
    pub password: &'a str,
    pub confirm_password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChangePasswordRequest<'a> {
    pub current_password: &'a str,
    pub new_password: &'a str,
    pub confirm_password: &'a str,
}

/// A catalog item saved to the user's favorites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    pub id: String,
    pub title: String,
    pub url: String,
    pub thumbnail: String,
}

/// Catalog search parameters. Blank `query`/`terms` are not sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoSearch {
    pub query: Option<String>,
    pub terms: Option<String>,
    pub per_page: u32,
}

impl VideoSearch {
    #[must_use]
    pub fn query(query: impl Into<String>) -> Self {
        Self { query: Some(query.into()), ..Self::default() }
    }

    #[must_use]
    pub fn with_terms(mut self, terms: impl Into<String>) -> Self {
        self.terms = Some(terms.into());
        self
    }

    #[must_use]
    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    /// Query pairs in wire order: `query`, `terms`, `per_page`.
    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(3);
        if let Some(query) = non_blank(self.query.as_deref()) {
            pairs.push(("query", query.to_owned()));
        }
        if let Some(terms) = non_blank(self.terms.as_deref()) {
            pairs.push(("terms", terms.to_owned()));
        }
        pairs.push(("per_page", self.per_page.to_string()));
        pairs
    }

    /// True when neither `query` nor `terms` carries text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        non_blank(self.query.as_deref()).is_none() && non_blank(self.terms.as_deref()).is_none()
    }
}

impl Default for VideoSearch {
    fn default() -> Self {
        Self { query: None, terms: None, per_page: DEFAULT_PER_PAGE }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
