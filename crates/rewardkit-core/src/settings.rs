//! Runtime settings resolved from the environment
//!
//! Environment access goes through [`EnvSource`] so resolution can be exercised
//! in tests without touching the process environment. Nothing is read at
//! startup; callers resolve settings when they first need them.

use std::collections::HashMap;

/// Default timeout for hosted scorer requests
pub const DEFAULT_SCORER_TIMEOUT_SECONDS: u64 = 60;

/// Environment variable overriding the hosted scorer timeout (seconds)
pub const SCORER_TIMEOUT_ENV: &str = "REWARDKIT_SCORER_TIMEOUT";

/// Read-only view of environment variables
pub trait EnvSource {
    fn var(&self, key: &str) -> Option<String>;

    /// Value of `key` with surrounding whitespace removed; blank values read as unset
    fn non_blank(&self, key: &str) -> Option<String> {
        self.var(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

/// The real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Environment variable holding a base URL override for `provider`,
/// e.g. `REWARDKIT_OPENAI_BASE_URL`
pub fn base_url_env_var(provider: &str) -> String {
    let name: String = provider
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("REWARDKIT_{}_BASE_URL", name)
}

/// Settings for the hosted scorer HTTP client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScorerSettings {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for ScorerSettings {
    fn default() -> Self {
        Self {
            timeout_seconds: DEFAULT_SCORER_TIMEOUT_SECONDS,
        }
    }
}

impl ScorerSettings {
    /// Load settings from the process environment
    pub fn from_env() -> Self {
        Self::from_env_source(&ProcessEnv)
    }

    pub fn from_env_source(env: &dyn EnvSource) -> Self {
        let mut settings = Self::default();

        if let Some(timeout) = env.non_blank(SCORER_TIMEOUT_ENV) {
            match timeout.parse::<u64>() {
                Ok(seconds) => settings.timeout_seconds = seconds.clamp(5, 600),
                Err(_) => tracing::warn!(value = %timeout, "ignoring invalid {}", SCORER_TIMEOUT_ENV),
            }
        }

        settings
    }
}
