//! Page transport: the capability that performs a page GET.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use tracing::debug;
use url::Url;

use crate::cache::PagePayload;
use crate::error::{PrefetchError, PrefetchResult};

/// Response header marking a page-protocol response; also sent on requests.
pub const PROTOCOL_HEADER: &str = "x-inertia";
/// Request header carrying the protocol version token.
pub const VERSION_HEADER: &str = "x-inertia-version";
pub const REQUESTED_WITH_HEADER: &str = "x-requested-with";

/// A page GET to perform.
#[derive(Debug, Clone)]
pub struct PageRequest {
    pub url: Url,
    pub headers: HeaderMap,
}

impl PageRequest {
    /// Builds the prefetch request for `url` with the negotiation headers
    /// and the version token.
    pub fn prefetch(url: Url, version: &str) -> PrefetchResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html, application/xhtml+xml"),
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            HeaderName::from_static(REQUESTED_WITH_HEADER),
            HeaderValue::from_static("XMLHttpRequest"),
        );
        headers.insert(
            HeaderName::from_static(PROTOCOL_HEADER),
            HeaderValue::from_static("true"),
        );
        headers.insert(
            HeaderName::from_static(VERSION_HEADER),
            HeaderValue::from_str(version)?,
        );
        Ok(Self { url, headers })
    }
}

/// What came back from a page GET.
#[derive(Debug, Clone)]
pub struct PageResponse {
    /// Whether the response declared itself a page-protocol response
    pub protocol_marker: bool,
    pub page: PagePayload,
}

// == Page Transport ==
/// Performs page GETs for the prefetcher.
#[async_trait]
pub trait PageTransport: Send + Sync {
    async fn fetch(&self, request: PageRequest) -> PrefetchResult<PageResponse>;
}

// == HTTP Transport ==
/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Creates a transport whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> PrefetchResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PrefetchError::Transport(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageTransport for HttpTransport {
    async fn fetch(&self, request: PageRequest) -> PrefetchResult<PageResponse> {
        debug!(url = %request.url, "fetching page");

        let response = self
            .client
            .get(request.url)
            .headers(request.headers)
            .send()
            .await?
            .error_for_status()?;

        let protocol_marker = response.headers().contains_key(PROTOCOL_HEADER);
        let page = response.json::<PagePayload>().await?;

        Ok(PageResponse {
            protocol_marker,
            page,
        })
    }
}
