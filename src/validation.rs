//! Local form rules checked before any request is built.
//!
//! One canonical rule set for every front end: signup and reset share the
//! strong-password policy, change-password uses the shorter minimum.

pub const MIN_SIGNUP_AGE: u32 = 18;
pub const MIN_STRONG_PASSWORD_LEN: usize = 8;
pub const MIN_CHANGED_PASSWORD_LEN: usize = 6;

/// Passwords rejected outright, compared case-insensitively.
pub const WEAK_PASSWORDS: &[&str] = &[
    "123456",
    "password",
    "qwerty",
    "abc123",
    "12345678",
    "123456789",
    "111111",
    "123123",
    "password1",
    "contraseña",
];

const PASSWORD_SYMBOLS: &str = "!@#$%^&*()_+-={}[]|;:\"<>,.?/~`";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required.")]
    Required(&'static str),
    #[error("Please enter your age.")]
    MissingAge,
    #[error("You must be at least 18 years old to register.")]
    Underage,
    #[error("The passwords do not match.")]
    PasswordMismatch,
    #[error("The password must have at least {0} characters.")]
    PasswordTooShort(usize),
    #[error("The password is too common. Please choose another one.")]
    CommonPassword,
    #[error("The password must include at least one uppercase letter, one number, and one symbol.")]
    WeakPassword,
}

/// Reject blank required fields.
///
/// # Errors
///
/// Returns [`ValidationError::Required`] naming `field` when `value` is blank.
pub fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(())
}

/// Parse a free-text age field and enforce the signup minimum.
///
/// # Errors
///
/// [`ValidationError::MissingAge`] for blank or non-numeric input,
/// [`ValidationError::Underage`] below the minimum.
pub fn validate_age(raw: &str) -> Result<u32, ValidationError> {
    let age = raw.trim().parse::<u32>().map_err(|_| ValidationError::MissingAge)?;
    if age < MIN_SIGNUP_AGE {
        return Err(ValidationError::Underage);
    }
    Ok(age)
}

/// # Errors
///
/// [`ValidationError::PasswordMismatch`] when the two entries differ.
pub fn validate_confirmation(password: &str, confirmation: &str) -> Result<(), ValidationError> {
    if password != confirmation {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

/// Strong-password policy for new accounts and resets.
///
/// # Errors
///
/// Length first, then the weak list, then the character-class rule.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_STRONG_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort(MIN_STRONG_PASSWORD_LEN));
    }
    let lowered = password.to_lowercase();
    if WEAK_PASSWORDS.contains(&lowered.as_str()) {
        return Err(ValidationError::CommonPassword);
    }
    let has_upper = password.chars().any(char::is_uppercase);
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| PASSWORD_SYMBOLS.contains(c));
    if !(has_upper && has_digit && has_symbol) {
        return Err(ValidationError::WeakPassword);
    }
    Ok(())
}

/// Minimum length for a signed-in password change.
///
/// # Errors
///
/// [`ValidationError::PasswordTooShort`] below the minimum.
pub fn validate_changed_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_CHANGED_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort(MIN_CHANGED_PASSWORD_LEN));
    }
    Ok(())
}

#[cfg(test)]
#[path = "validation_test.rs"]
mod tests;
