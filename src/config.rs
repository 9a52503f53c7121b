//! Service configuration parsed from environment variables.
//!
//! The optimizer lives at a fixed base URL and the retry policy is static; both
//! are read once at startup. Unparseable numeric overrides fall back to the
//! defaults rather than failing, matching how the form treats bad input.

use std::time::Duration;

use crate::error::ErrorCode;

pub const DEFAULT_BASE_URL: &str = "https://examoptim.onrender.com";
pub const DEFAULT_SCHEDULE_PATH: &str = "/api/schedule";
pub const DEFAULT_EXAMPLE_PATH: &str = "/api/example";
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_BACKOFF_BASE_MS: u64 = 2000;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config value {var} must not be empty")]
    Empty { var: &'static str },
}

impl ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Empty { .. } => "E_CONFIG_EMPTY",
        }
    }
}

// =============================================================================
// RETRY POLICY
// =============================================================================

/// Bounded linear backoff: retry `n` waits `n × backoff_base`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff_base: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_retries: DEFAULT_MAX_RETRIES, backoff_base: Duration::from_millis(DEFAULT_BACKOFF_BASE_MS) }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (1-based).
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff_base.saturating_mul(attempt)
    }

    /// Total transport attempts a fully failing submission makes.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

// =============================================================================
// SERVICE CONFIG
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub base_url: String,
    pub schedule_path: String,
    pub example_path: String,
    pub retry: RetryPolicy,
    pub timeouts: Timeouts,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            schedule_path: DEFAULT_SCHEDULE_PATH.to_owned(),
            example_path: DEFAULT_EXAMPLE_PATH.to_owned(),
            retry: RetryPolicy::default(),
            timeouts: Timeouts {
                request_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
                connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            },
        }
    }
}

impl ServiceConfig {
    /// Build typed service config from environment variables.
    ///
    /// Optional:
    /// - `EXAMGRID_BASE_URL`: optimizer base URL (trailing `/` trimmed)
    /// - `EXAMGRID_SCHEDULE_PATH`: default `/api/schedule`
    /// - `EXAMGRID_EXAMPLE_PATH`: default `/api/example`
    /// - `EXAMGRID_MAX_RETRIES`: default 3
    /// - `EXAMGRID_BACKOFF_BASE_MS`: default 2000
    /// - `EXAMGRID_REQUEST_TIMEOUT_SECS`: default 60
    /// - `EXAMGRID_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Empty`] when the base URL is set to an empty string.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = std::env::var("EXAMGRID_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned())
            .trim()
            .trim_end_matches('/')
            .to_owned();
        if base_url.is_empty() {
            return Err(ConfigError::Empty { var: "EXAMGRID_BASE_URL" });
        }

        let schedule_path = normalize_path(
            std::env::var("EXAMGRID_SCHEDULE_PATH").unwrap_or_else(|_| DEFAULT_SCHEDULE_PATH.to_owned()),
        );
        let example_path = normalize_path(
            std::env::var("EXAMGRID_EXAMPLE_PATH").unwrap_or_else(|_| DEFAULT_EXAMPLE_PATH.to_owned()),
        );

        let retry = RetryPolicy {
            max_retries: env_parse("EXAMGRID_MAX_RETRIES", DEFAULT_MAX_RETRIES),
            backoff_base: Duration::from_millis(env_parse("EXAMGRID_BACKOFF_BASE_MS", DEFAULT_BACKOFF_BASE_MS)),
        };
        let timeouts = Timeouts {
            request_secs: env_parse("EXAMGRID_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse("EXAMGRID_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        Ok(Self { base_url, schedule_path, example_path, retry, timeouts })
    }

    #[must_use]
    pub fn schedule_url(&self) -> String {
        format!("{}{}", self.base_url, self.schedule_path)
    }

    #[must_use]
    pub fn example_url(&self) -> String {
        format!("{}{}", self.base_url, self.example_path)
    }
}

fn normalize_path(raw: String) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('/') { trimmed.to_owned() } else { format!("/{trimmed}") }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
