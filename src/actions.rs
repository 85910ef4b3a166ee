//! Form submission flows.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each flow validates its form locally and only then calls the matching
//! [`ApiClient`] operation, so a rejected form never produces traffic and
//! never produces an [`ApiError`].

use serde_json::Value;

use crate::api::types::{ProfileUpdate, SignupRequest};
use crate::api::{ApiClient, ApiError};
use crate::validation::{
    ValidationError, require, validate_age, validate_changed_password, validate_confirmation,
    validate_password_strength,
};

#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// Rejected locally; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl ActionError {
    #[must_use]
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

// =============================================================================
// FORMS
// =============================================================================

/// Raw signup input as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub first_name: String,
    pub last_name: String,
    pub age: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignupForm {
    /// # Errors
    ///
    /// Returns the first failing rule: required fields, age, confirmation,
    /// then password strength.
    pub fn validate(&self) -> Result<SignupRequest, ValidationError> {
        require("First name", &self.first_name)?;
        require("Last name", &self.last_name)?;
        require("Email", &self.email)?;
        let age = validate_age(&self.age)?;
        validate_confirmation(&self.password, &self.confirm_password)?;
        validate_password_strength(&self.password)?;
        Ok(SignupRequest {
            first_name: self.first_name.trim().to_owned(),
            last_name: self.last_name.trim().to_owned(),
            age,
            email: self.email.trim().to_owned(),
            password: self.password.clone(),
            confirm_password: Some(self.confirm_password.clone()),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub first_name: String,
    pub last_name: String,
    pub age: String,
    pub email: String,
}

impl ProfileForm {
    /// # Errors
    ///
    /// Returns the first failing rule: required fields, then age.
    pub fn validate(&self) -> Result<ProfileUpdate, ValidationError> {
        require("First name", &self.first_name)?;
        require("Last name", &self.last_name)?;
        require("Email", &self.email)?;
        let age = validate_age(&self.age)?;
        Ok(ProfileUpdate {
            first_name: self.first_name.trim().to_owned(),
            last_name: self.last_name.trim().to_owned(),
            age,
            email: self.email.trim().to_owned(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResetForm {
    pub token: String,
    pub password: String,
    pub confirm_password: String,
}

impl ResetForm {
    /// # Errors
    ///
    /// Returns the first failing rule: token present, confirmation, then
    /// password strength.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("Reset token", &self.token)?;
        validate_confirmation(&self.password, &self.confirm_password)?;
        validate_password_strength(&self.password)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangePasswordForm {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl ChangePasswordForm {
    /// # Errors
    ///
    /// Returns the first failing rule: current password present, minimum
    /// length, then confirmation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("Current password", &self.current_password)?;
        validate_changed_password(&self.new_password)?;
        validate_confirmation(&self.new_password, &self.confirm_password)
    }
}

// =============================================================================
// SUBMISSIONS
// =============================================================================

/// # Errors
///
/// [`ActionError::Validation`] before any request, or the request's
/// [`ApiError`].
pub async fn submit_signup(client: &ApiClient, form: &SignupForm) -> Result<Value, ActionError> {
    let request = form.validate()?;
    Ok(client.signup(&request).await?)
}

/// # Errors
///
/// [`ActionError::Validation`] for blank fields, or the request's
/// [`ApiError`].
pub async fn submit_login(client: &ApiClient, email: &str, password: &str) -> Result<Value, ActionError> {
    require("Email", email)?;
    require("Password", password)?;
    Ok(client.login(email.trim(), password).await?)
}

/// # Errors
///
/// [`ActionError::Validation`] for a blank email, or the request's
/// [`ApiError`].
pub async fn submit_forgot(client: &ApiClient, email: &str) -> Result<Value, ActionError> {
    require("Email", email)?;
    Ok(client.forgot_password(email.trim()).await?)
}

/// # Errors
///
/// [`ActionError::Validation`] before any request, or the request's
/// [`ApiError`].
pub async fn submit_reset(client: &ApiClient, form: &ResetForm) -> Result<Value, ActionError> {
    form.validate()?;
    Ok(client
        .reset_password(form.token.trim(), &form.password, &form.confirm_password)
        .await?)
}

/// # Errors
///
/// [`ActionError::Validation`] before any request, or the request's
/// [`ApiError`].
pub async fn submit_change_password(client: &ApiClient, form: &ChangePasswordForm) -> Result<Value, ActionError> {
    form.validate()?;
    Ok(client
        .change_password(&form.current_password, &form.new_password, &form.confirm_password)
        .await?)
}

/// # Errors
///
/// [`ActionError::Validation`] before any request, or the request's
/// [`ApiError`].
pub async fn submit_profile(client: &ApiClient, form: &ProfileForm) -> Result<Value, ActionError> {
    let update = form.validate()?;
    Ok(client.update_me(&update).await?)
}

/// Delete the account, then sign out. The session survives a failed
/// deletion so the user can retry.
///
/// # Errors
///
/// Returns the deletion request's [`ApiError`].
pub async fn delete_account(client: &ApiClient) -> Result<Value, ApiError> {
    let ack = client.delete_me().await?;
    client.logout();
    Ok(ack)
}

#[cfg(test)]
#[path = "actions_test.rs"]
mod tests;
