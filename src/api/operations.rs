//! Named backend operations.
//!
//! Each operation binds one method + path + body onto
//! [`ApiClient::request`]. Only `login` and `logout` touch the session store;
//! everything else is a plain descriptor binding.

use serde_json::{Value, json};

use super::types::{
    ChangePasswordRequest, Favorite, ForgotRequest, LoginRequest, ProfileUpdate, ResetRequest, SignupRequest,
    VideoSearch,
};
use super::{ApiClient, ApiError, RequestDescriptor};
use crate::session::Credential;

pub const SIGNUP_PATH: &str = "/api/auth/signup";
pub const LOGIN_PATH: &str = "/api/auth/login";
pub const FORGOT_PATH: &str = "/api/auth/forgot";
pub const RESET_PATH: &str = "/api/auth/reset";
pub const ME_PATH: &str = "/api/users/me";
pub const PASSWORD_PATH: &str = "/api/users/password";
pub const CATALOG_HEALTH_PATH: &str = "/api/pexels/";
pub const POPULAR_VIDEOS_PATH: &str = "/api/pexels/videos/popular";
pub const SEARCH_VIDEOS_PATH: &str = "/api/pexels/videos/search";
pub const VIDEOS_PATH: &str = "/api/pexels/videos";
pub const FAVORITES_PATH: &str = "/api/favorites";

impl ApiClient {
    // =========================================================================
    // AUTH
    // =========================================================================

    /// `POST /api/auth/signup`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails.
    pub async fn signup(&self, request: &SignupRequest) -> Result<Value, ApiError> {
        self.request(&RequestDescriptor::post(SIGNUP_PATH).json(request)?).await
    }

    /// `POST /api/auth/login`. A `token` in the response becomes the
    /// session credential before the body is returned.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails; the session is left
    /// untouched in that case.
    pub async fn login(&self, email: &str, password: &str) -> Result<Value, ApiError> {
        let descriptor = RequestDescriptor::post(LOGIN_PATH).json(&LoginRequest { email, password })?;
        let body = self.request(&descriptor).await?;
        match body.get("token").and_then(Value::as_str).filter(|t| !t.is_empty()) {
            Some(token) => {
                self.session().set(Credential::new(token));
                tracing::info!("session established");
            }
            None => tracing::warn!("login response carried no token"),
        }
        Ok(body)
    }

    /// Clear the session. No network call; always succeeds.
    pub fn logout(&self) -> Value {
        self.session().clear();
        tracing::info!("session cleared");
        json!({ "ok": true })
    }

    /// `POST /api/auth/forgot`. The server answers generically whether or
    /// not the address exists.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails.
    pub async fn forgot_password(&self, email: &str) -> Result<Value, ApiError> {
        self.request(&RequestDescriptor::post(FORGOT_PATH).json(&ForgotRequest { email })?).await
    }

    /// `POST /api/auth/reset` with the token from the reset link.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails.
    pub async fn reset_password(&self, token: &str, password: &str, confirm_password: &str) -> Result<Value, ApiError> {
        let body = ResetRequest { token, password, confirm_password };
        self.request(&RequestDescriptor::post(RESET_PATH).json(&body)?).await
    }

    // =========================================================================
    // PROFILE
    // =========================================================================

    /// `GET /api/users/me`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails.
    pub async fn me(&self) -> Result<Value, ApiError> {
        self.request(&RequestDescriptor::get(ME_PATH)).await
    }

    /// `PUT /api/users/me`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails.
    pub async fn update_me(&self, update: &ProfileUpdate) -> Result<Value, ApiError> {
        self.request(&RequestDescriptor::put(ME_PATH).json(update)?).await
    }

    /// `DELETE /api/users/me`. Does not clear the session; see
    /// [`crate::actions::delete_account`].
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails.
    pub async fn delete_me(&self) -> Result<Value, ApiError> {
        self.request(&RequestDescriptor::delete(ME_PATH)).await
    }

    /// `PUT /api/users/password` for a signed-in user.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails.
    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<Value, ApiError> {
        let body = ChangePasswordRequest { current_password, new_password, confirm_password };
        self.request(&RequestDescriptor::put(PASSWORD_PATH).json(&body)?).await
    }

    // =========================================================================
    // CATALOG
    // =========================================================================

    /// `GET /api/pexels/` health probe for the catalog proxy.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails.
    pub async fn catalog_health(&self) -> Result<Value, ApiError> {
        self.request(&RequestDescriptor::get(CATALOG_HEALTH_PATH)).await
    }

    /// `GET /api/pexels/videos/popular`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails.
    pub async fn popular_videos(&self) -> Result<Value, ApiError> {
        self.request(&RequestDescriptor::get(POPULAR_VIDEOS_PATH)).await
    }

    /// `GET /api/pexels/videos/search?query&terms&per_page`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails.
    pub async fn search_videos(&self, search: &VideoSearch) -> Result<Value, ApiError> {
        let descriptor = search
            .to_query()
            .into_iter()
            .fold(RequestDescriptor::get(SEARCH_VIDEOS_PATH), |d, (key, value)| d.query(key, value));
        self.request(&descriptor).await
    }

    /// `GET /api/pexels/videos/{id}`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails.
    pub async fn video(&self, id: &str) -> Result<Value, ApiError> {
        self.request(&RequestDescriptor::get(VIDEOS_PATH).segment(id)).await
    }

    // =========================================================================
    // FAVORITES
    // =========================================================================

    /// `GET /api/favorites`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails.
    pub async fn favorites(&self) -> Result<Value, ApiError> {
        self.request(&RequestDescriptor::get(FAVORITES_PATH)).await
    }

    /// `POST /api/favorites`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails.
    pub async fn add_favorite(&self, favorite: &Favorite) -> Result<Value, ApiError> {
        self.request(&RequestDescriptor::post(FAVORITES_PATH).json(favorite)?).await
    }

    /// `DELETE /api/favorites/{id}`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails.
    pub async fn remove_favorite(&self, id: &str) -> Result<Value, ApiError> {
        self.request(&RequestDescriptor::delete(FAVORITES_PATH).segment(id)).await
    }
}

#[cfg(test)]
#[path = "operations_test.rs"]
mod tests;
