//! API Handlers
//!
//! HTTP request handlers for the cache diagnostics endpoints.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    CacheListResponse, EnabledRequest, EntryResponse, HealthResponse, KeyQuery, MessageResponse,
    PolicyResponse, PrefetchRequest, StatsResponse, UrlListRequest, VersionRequest,
};
use crate::prefetch::{CacheEngine, PageTransport};

/// Application state shared across all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// The page cache and prefetcher
    pub engine: CacheEngine,
}

impl AppState {
    /// Creates a new AppState around an existing engine.
    pub fn new(engine: CacheEngine) -> Self {
        Self { engine }
    }

    /// Creates a new AppState from configuration and a transport.
    pub fn from_config(config: &Config, transport: Arc<dyn PageTransport>) -> Result<Self> {
        let engine = CacheEngine::new(config, transport)?;
        Ok(Self::new(engine))
    }

    async fn policy(&self) -> PolicyResponse {
        PolicyResponse {
            enabled: self.engine.is_enabled().await,
            ignored: self.engine.ignored().await,
            version: self.engine.version().await,
        }
    }
}

/// Handler for GET /cache
///
/// Lists every entry, pending placeholders included.
pub async fn list_handler(State(state): State<AppState>) -> Json<CacheListResponse> {
    let snapshot = state.engine.all().await;
    let now = state.engine.now().await;
    Json(CacheListResponse::from_snapshot(&snapshot, now))
}

/// Handler for GET /cache/entry?key=
///
/// Reads through the cache, so expiry and recency rules apply.
pub async fn get_entry_handler(
    State(state): State<AppState>,
    Query(query): Query<KeyQuery>,
) -> Result<Json<EntryResponse>> {
    let entry = state
        .engine
        .get(&query.key)
        .await
        .ok_or_else(|| CacheError::NotFound(query.key.clone()))?;

    Ok(Json(EntryResponse::new(query.key, entry)))
}

/// Handler for DELETE /cache/entry?key=
pub async fn remove_entry_handler(
    State(state): State<AppState>,
    Query(query): Query<KeyQuery>,
) -> Result<Json<MessageResponse>> {
    state
        .engine
        .remove(&query.key)
        .await
        .ok_or_else(|| CacheError::NotFound(query.key.clone()))?;

    Ok(Json(MessageResponse::new(format!(
        "Key '{}' removed",
        query.key
    ))))
}

/// Handler for DELETE /cache
pub async fn clear_handler(State(state): State<AppState>) -> Json<MessageResponse> {
    state.engine.remove_all().await;
    Json(MessageResponse::new("Cache cleared"))
}

/// Handler for GET /cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.engine.stats().await.into())
}

/// Handler for POST /prefetch
///
/// Starts the prefetch and returns immediately; progress shows up in GET /cache.
pub async fn prefetch_handler(
    State(state): State<AppState>,
    Json(req): Json<PrefetchRequest>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let options = req.options(state.engine.default_options());
    state.engine.spawn_prefetch(req.href.clone(), options);

    Ok((
        StatusCode::ACCEPTED,
        Json(MessageResponse::new(format!("Prefetch of '{}' started", req.href))),
    ))
}

/// Handler for PUT /ignore
pub async fn ignore_handler(
    State(state): State<AppState>,
    Json(req): Json<UrlListRequest>,
) -> Json<PolicyResponse> {
    state.engine.ignore(req.urls).await;
    Json(state.policy().await)
}

/// Handler for PUT /accept
pub async fn accept_handler(
    State(state): State<AppState>,
    Json(req): Json<UrlListRequest>,
) -> Json<PolicyResponse> {
    state.engine.accept(req.urls).await;
    Json(state.policy().await)
}

/// Handler for PUT /version
pub async fn version_handler(
    State(state): State<AppState>,
    Json(req): Json<VersionRequest>,
) -> Result<Json<PolicyResponse>> {
    if matches!(req.version.as_deref(), Some(v) if v.trim().is_empty()) {
        return Err(CacheError::InvalidRequest(
            "version cannot be empty; send null to clear it".to_string(),
        ));
    }

    state.engine.set_version(req.version).await;
    Ok(Json(state.policy().await))
}

/// Handler for PUT /enabled
pub async fn enabled_handler(
    State(state): State<AppState>,
    Json(req): Json<EnabledRequest>,
) -> Json<PolicyResponse> {
    state.engine.set_enabled(req.on).await;
    Json(state.policy().await)
}

/// Handler for GET /policy
pub async fn policy_handler(State(state): State<AppState>) -> Json<PolicyResponse> {
    Json(state.policy().await)
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
