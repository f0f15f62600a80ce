//! Configuration Module
//!
//! Loads cache, prefetch and server settings from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{DEFAULT_DURATION_MINUTES, DEFAULT_SIZE_LIMIT};

/// Cache engine and diagnostics server parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of cached pages
    pub size_limit: usize,
    /// Whether caching starts enabled
    pub enabled: bool,
    /// Lifetime of a prefetched page when the caller gives none, in minutes
    pub default_duration_minutes: f64,
    /// Lifetime of a pending placeholder, in minutes
    pub placeholder_duration_minutes: f64,
    /// Delay between retries while the version token is unknown
    pub retry_delay_ms: u64,
    /// Retries before a deferred prefetch is abandoned
    pub max_retries: u32,
    /// Origin relative prefetch targets are resolved against
    pub origin: String,
    /// Per-request timeout of the HTTP transport, in seconds
    pub request_timeout_secs: u64,
    /// Diagnostics server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_SIZE_LIMIT` - Maximum cached pages (default: 20)
    /// - `CACHE_ENABLED` - Start with caching on (default: true)
    /// - `PREFETCH_DURATION_MINUTES` - Default page lifetime (default: 1)
    /// - `PLACEHOLDER_DURATION_MINUTES` - Pending placeholder lifetime (default: 1)
    /// - `PREFETCH_RETRY_DELAY_MS` - Delay between version retries (default: 700)
    /// - `PREFETCH_MAX_RETRIES` - Version retries before giving up (default: 3)
    /// - `APP_ORIGIN` - Origin for relative targets (default: http://localhost:8000)
    /// - `PREFETCH_TIMEOUT_SECS` - HTTP request timeout (default: 30)
    /// - `SERVER_PORT` - Diagnostics server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            size_limit: env_or("CACHE_SIZE_LIMIT", defaults.size_limit),
            enabled: env_or("CACHE_ENABLED", defaults.enabled),
            default_duration_minutes: env_or(
                "PREFETCH_DURATION_MINUTES",
                defaults.default_duration_minutes,
            ),
            placeholder_duration_minutes: env_or(
                "PLACEHOLDER_DURATION_MINUTES",
                defaults.placeholder_duration_minutes,
            ),
            retry_delay_ms: env_or("PREFETCH_RETRY_DELAY_MS", defaults.retry_delay_ms),
            max_retries: env_or("PREFETCH_MAX_RETRIES", defaults.max_retries),
            origin: env::var("APP_ORIGIN").unwrap_or(defaults.origin),
            request_timeout_secs: env_or("PREFETCH_TIMEOUT_SECS", defaults.request_timeout_secs),
            server_port: env_or("SERVER_PORT", defaults.server_port),
        }
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            size_limit: DEFAULT_SIZE_LIMIT,
            enabled: true,
            default_duration_minutes: DEFAULT_DURATION_MINUTES,
            placeholder_duration_minutes: DEFAULT_DURATION_MINUTES,
            retry_delay_ms: 700,
            max_retries: 3,
            origin: "http://localhost:8000".to_string(),
            request_timeout_secs: 30,
            server_port: 3000,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
