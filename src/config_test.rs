use super::*;

/// # Safety
/// Env vars are process globals; only `from_env_defaults_and_overrides`
/// touches the `LUMINA_*` variables.
unsafe fn clear_lumina_env() {
    unsafe {
        std::env::remove_var("LUMINA_API");
        std::env::remove_var("LUMINA_API_BASE_URL");
        std::env::remove_var("LUMINA_SESSION_FILE");
        std::env::remove_var("LUMINA_SESSION_POLL_MS");
        std::env::remove_var("LUMINA_AUTH_FAILURE_POLICY");
    }
}

#[test]
fn from_env_defaults_and_overrides() {
    unsafe { clear_lumina_env() };

    let cfg = ClientConfig::from_env().unwrap();
    assert_eq!(cfg.base_url, DEFAULT_API_BASE_URL);
    assert_eq!(cfg.session_poll, Duration::from_millis(DEFAULT_SESSION_POLL_MS));
    assert_eq!(cfg.auth_failure_policy, AuthFailurePolicy::ClearSession);
    assert!(cfg.session_file.ends_with(".lumina/session.json"));

    unsafe {
        std::env::set_var("LUMINA_API_BASE_URL", "https://fallback.test");
        std::env::set_var("LUMINA_API", "https://api.lumina.test/");
        std::env::set_var("LUMINA_SESSION_FILE", "/tmp/lumina-session.json");
        std::env::set_var("LUMINA_SESSION_POLL_MS", "25");
        std::env::set_var("LUMINA_AUTH_FAILURE_POLICY", "caller");
    }

    let cfg = ClientConfig::from_env().unwrap();
    assert_eq!(cfg.base_url, "https://api.lumina.test");
    assert_eq!(cfg.session_file, PathBuf::from("/tmp/lumina-session.json"));
    assert_eq!(cfg.session_poll, Duration::from_millis(25));
    assert_eq!(cfg.auth_failure_policy, AuthFailurePolicy::LeaveToCaller);

    unsafe { std::env::remove_var("LUMINA_API") };
    let cfg = ClientConfig::from_env().unwrap();
    assert_eq!(cfg.base_url, "https://fallback.test");

    unsafe {
        std::env::set_var("LUMINA_AUTH_FAILURE_POLICY", "sometimes");
    }
    let err = ClientConfig::from_env().unwrap_err().to_string();
    assert!(err.contains("LUMINA_AUTH_FAILURE_POLICY"));

    unsafe { clear_lumina_env() };
}

#[test]
fn new_trims_trailing_slashes() {
    assert_eq!(ClientConfig::new("http://localhost:3000//").base_url, "http://localhost:3000");
}

#[test]
fn default_session_file_uses_home() {
    assert_eq!(default_session_file(Some("/home/ana")), PathBuf::from("/home/ana/.lumina/session.json"));
    assert_eq!(default_session_file(None), PathBuf::from(".lumina/session.json"));
    assert_eq!(default_session_file(Some("")), PathBuf::from(".lumina/session.json"));
}

#[test]
fn env_parse_u64_rejects_zero_and_garbage() {
    let key = "__TEST_LUMINA_POLL_4411__";
    unsafe { std::env::set_var(key, "0") };
    assert_eq!(env_parse_u64(key, 7), 7);
    unsafe { std::env::set_var(key, "abc") };
    assert_eq!(env_parse_u64(key, 7), 7);
    unsafe { std::env::set_var(key, " 12 ") };
    assert_eq!(env_parse_u64(key, 7), 12);
    unsafe { std::env::remove_var(key) };
}

#[test]
fn policy_parsing() {
    assert_eq!(parse_auth_failure_policy(None).unwrap(), AuthFailurePolicy::ClearSession);
    assert_eq!(parse_auth_failure_policy(Some("clear")).unwrap(), AuthFailurePolicy::ClearSession);
    assert_eq!(parse_auth_failure_policy(Some("caller")).unwrap(), AuthFailurePolicy::LeaveToCaller);
    assert!(parse_auth_failure_policy(Some("bad")).is_err());
}
