use super::*;

/// # Safety
/// Tests must run with `--test-threads=1` to avoid env races.
unsafe fn clear_gemini_env() {
    unsafe {
        std::env::remove_var("GOOGLE_AI_API_KEY");
        std::env::remove_var("GEMINI_MODEL");
        std::env::remove_var("GEMINI_BASE_URL");
        std::env::remove_var("GEMINI_REQUEST_TIMEOUT_SECS");
        std::env::remove_var("GEMINI_CONNECT_TIMEOUT_SECS");
    }
}

// All scenarios share one test so they never race on the process env.
#[test]
fn from_env_scenarios() {
    // Defaults.
    unsafe {
        clear_gemini_env();
        std::env::set_var("GOOGLE_AI_API_KEY", "secret");
    }
    let cfg = GeminiConfig::from_env().unwrap();
    assert_eq!(cfg.api_key, "secret");
    assert_eq!(cfg.model, DEFAULT_GEMINI_MODEL);
    assert_eq!(cfg.base_url, DEFAULT_GEMINI_BASE_URL);
    assert_eq!(cfg.timeouts, LlmTimeouts::default());
    assert_eq!(cfg.timeouts.request_secs, 60);

    // Overrides.
    unsafe {
        std::env::set_var("GEMINI_MODEL", "gemini-test-image");
        std::env::set_var("GEMINI_BASE_URL", "https://example.test/v1beta/");
        std::env::set_var("GEMINI_REQUEST_TIMEOUT_SECS", "42");
        std::env::set_var("GEMINI_CONNECT_TIMEOUT_SECS", "7");
    }
    let cfg = GeminiConfig::from_env().unwrap();
    assert_eq!(cfg.model, "gemini-test-image");
    assert_eq!(cfg.base_url, "https://example.test/v1beta");
    assert_eq!(cfg.timeouts, LlmTimeouts { request_secs: 42, connect_secs: 7 });

    // Bad timeout.
    unsafe { std::env::set_var("GEMINI_REQUEST_TIMEOUT_SECS", "0") };
    let err = GeminiConfig::from_env().unwrap_err();
    assert!(matches!(err, LlmError::ConfigParse(ref msg) if msg.contains("GEMINI_REQUEST_TIMEOUT_SECS")));

    // Blank key counts as missing.
    unsafe {
        clear_gemini_env();
        std::env::set_var("GOOGLE_AI_API_KEY", "   ");
    }
    let err = GeminiConfig::from_env().unwrap_err();
    assert!(matches!(err, LlmError::MissingApiKey { ref var } if var == "GOOGLE_AI_API_KEY"));

    // Unset key.
    unsafe { clear_gemini_env() };
    assert!(matches!(GeminiConfig::from_env(), Err(LlmError::MissingApiKey { .. })));
}
