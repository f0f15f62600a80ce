//! Error types for the page cache
//!
//! Prefetch failures are swallowed by the engine and only logged; the API
//! error type maps onto HTTP responses for the diagnostics server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Prefetch Error Enum ==
/// Why a prefetch did not produce a cached page.
#[derive(Error, Debug)]
pub enum PrefetchError {
    /// Target could not be turned into an absolute URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A request header value was rejected (e.g. a version token with control characters)
    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    /// The request never produced a response
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status
    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    /// The response body was not a page payload
    #[error("Decode error: {0}")]
    Decode(String),

    /// The response carried neither the protocol marker nor the static flag
    #[error("Not a page response: {0}")]
    NotPageResponse(String),
}

impl From<reqwest::Error> for PrefetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            PrefetchError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            PrefetchError::Status {
                status: status.as_u16(),
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
            }
        } else {
            PrefetchError::Transport(err.to_string())
        }
    }
}

/// Result type for prefetch internals.
pub type PrefetchResult<T> = std::result::Result<T, PrefetchError>;

// == Cache Error Enum ==
/// Error type for the diagnostics API.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key not found in cache
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<PrefetchError> for CacheError {
    fn from(err: PrefetchError) -> Self {
        match err {
            PrefetchError::InvalidUrl(_) | PrefetchError::InvalidHeader(_) => {
                CacheError::InvalidRequest(err.to_string())
            }
            other => CacheError::Internal(other.to_string()),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            CacheError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            CacheError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            CacheError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the diagnostics API.
pub type Result<T> = std::result::Result<T, CacheError>;
