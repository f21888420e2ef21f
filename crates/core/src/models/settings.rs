use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Default backend location used by the dashboard during development.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";

/// Default per-request timeout in seconds (native targets only).
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable overriding the backend base URL.
pub const ENV_API_BASE_URL: &str = "TRADE_JOURNAL_API_URL";

/// Environment variable overriding the request timeout.
pub const ENV_TIMEOUT_SECS: &str = "TRADE_JOURNAL_TIMEOUT_SECS";

/// Client configuration for the REST backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Base URL of the backend API, without a trailing slash.
    pub api_base_url: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// Defaults, overridden by `TRADE_JOURNAL_API_URL` / `TRADE_JOURNAL_TIMEOUT_SECS` when set.
    pub fn from_env() -> Result<Self, CoreError> {
        let mut settings = Self::default();
        if let Ok(url) = std::env::var(ENV_API_BASE_URL) {
            settings.set_api_base_url(&url)?;
        }
        if let Ok(raw) = std::env::var(ENV_TIMEOUT_SECS) {
            let secs = raw.trim().parse::<u64>().map_err(|_| {
                CoreError::ValidationError(format!(
                    "{ENV_TIMEOUT_SECS} must be a whole number of seconds, got '{raw}'"
                ))
            })?;
            settings.set_timeout_secs(secs)?;
        }
        Ok(settings)
    }

    /// Set the backend base URL. Must be an absolute http(s) URL.
    pub fn set_api_base_url(&mut self, url: &str) -> Result<(), CoreError> {
        let trimmed = url.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(CoreError::ValidationError(format!(
                "Invalid API base URL '{url}': must start with http:// or https://"
            )));
        }
        self.api_base_url = trimmed.to_string();
        Ok(())
    }

    /// Set the request timeout. Zero is rejected.
    pub fn set_timeout_secs(&mut self, secs: u64) -> Result<(), CoreError> {
        if secs == 0 {
            return Err(CoreError::ValidationError(
                "Request timeout must be at least 1 second".into(),
            ));
        }
        self.timeout_secs = secs;
        Ok(())
    }

    /// Builder-style variant of [`Settings::set_api_base_url`].
    pub fn with_api_base_url(mut self, url: &str) -> Result<Self, CoreError> {
        self.set_api_base_url(url)?;
        Ok(self)
    }
}
