//! Client configuration parsed from environment variables.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_SESSION_POLL_MS: u64 = 500;
const SESSION_DIR: &str = ".lumina";
const SESSION_FILE: &str = "session.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    Parse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

/// What the API client does when a request carrying a credential is
/// rejected with `401 Unauthorized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthFailurePolicy {
    /// Clear the session store so every observer sees the logout.
    #[default]
    ClearSession,
    /// Keep the credential; callers react to the error themselves.
    LeaveToCaller,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub session_file: PathBuf,
    pub session_poll: Duration,
    pub auth_failure_policy: AuthFailurePolicy,
}

impl ClientConfig {
    /// Config for `base_url` with every other setting at its default.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            session_file: default_session_file(std::env::var("HOME").ok().as_deref()),
            session_poll: Duration::from_millis(DEFAULT_SESSION_POLL_MS),
            auth_failure_policy: AuthFailurePolicy::default(),
        }
    }

    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `LUMINA_API`, then `LUMINA_API_BASE_URL`: backend base URL,
    ///   default `http://localhost:3000`
    /// - `LUMINA_SESSION_FILE`: default `$HOME/.lumina/session.json`
    /// - `LUMINA_SESSION_POLL_MS`: default 500
    /// - `LUMINA_AUTH_FAILURE_POLICY`: `clear` (default) or `caller`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for an unknown auth-failure policy.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = non_empty_env("LUMINA_API")
            .or_else(|| non_empty_env("LUMINA_API_BASE_URL"))
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned());
        let session_file = non_empty_env("LUMINA_SESSION_FILE")
            .map_or_else(|| default_session_file(std::env::var("HOME").ok().as_deref()), PathBuf::from);
        let session_poll = Duration::from_millis(env_parse_u64("LUMINA_SESSION_POLL_MS", DEFAULT_SESSION_POLL_MS));
        let auth_failure_policy = parse_auth_failure_policy(non_empty_env("LUMINA_AUTH_FAILURE_POLICY").as_deref())?;

        Ok(Self { base_url: normalize_base_url(&base_url), session_file, session_poll, auth_failure_policy })
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_owned()
}

fn default_session_file(home: Option<&str>) -> PathBuf {
    let root = home.filter(|h| !h.is_empty()).map_or_else(PathBuf::new, PathBuf::from);
    root.join(SESSION_DIR).join(SESSION_FILE)
}

fn parse_auth_failure_policy(raw: Option<&str>) -> Result<AuthFailurePolicy, ConfigError> {
    match raw.unwrap_or("clear") {
        "clear" => Ok(AuthFailurePolicy::ClearSession),
        "caller" => Ok(AuthFailurePolicy::LeaveToCaller),
        other => Err(ConfigError::Parse(format!(
            "unknown LUMINA_AUTH_FAILURE_POLICY '{other}' (expected 'clear' or 'caller')"
        ))),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
