//! Request DTOs for the diagnostics API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::Deserialize;

use crate::prefetch::PrefetchOptions;

/// Request body for POST /prefetch
///
/// # Fields
/// - `href`: Navigation target, absolute or relative to the app origin
/// - `durationInMinutes`: Optional lifetime of the cached page
/// - `isStatic`: Optional, fetch the static variant
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrefetchRequest {
    pub href: String,
    #[serde(default)]
    pub duration_in_minutes: Option<f64>,
    #[serde(default)]
    pub is_static: Option<bool>,
}

impl PrefetchRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.href.trim().is_empty() {
            return Some("href cannot be empty".to_string());
        }
        match self.duration_in_minutes {
            Some(minutes) if !minutes.is_finite() || minutes <= 0.0 => {
                Some("durationInMinutes must be a positive number".to_string())
            }
            _ => None,
        }
    }

    /// Fills unset fields from `defaults`.
    pub fn options(&self, defaults: PrefetchOptions) -> PrefetchOptions {
        PrefetchOptions {
            duration_in_minutes: self
                .duration_in_minutes
                .unwrap_or(defaults.duration_in_minutes),
            is_static: self.is_static.unwrap_or(defaults.is_static),
        }
    }
}

/// Request body for PUT /ignore and PUT /accept
#[derive(Debug, Clone, Deserialize)]
pub struct UrlListRequest {
    pub urls: Vec<String>,
}

/// Request body for PUT /version
#[derive(Debug, Clone, Deserialize)]
pub struct VersionRequest {
    /// New token; null clears it
    pub version: Option<String>,
}

/// Request body for PUT /enabled
#[derive(Debug, Clone, Deserialize)]
pub struct EnabledRequest {
    pub on: bool,
}

/// Query string `?key=` selecting one cache entry
#[derive(Debug, Clone, Deserialize)]
pub struct KeyQuery {
    pub key: String,
}
