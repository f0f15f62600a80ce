//! API Routes
//!
//! Configures the Axum router with all diagnostics endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    accept_handler, clear_handler, enabled_handler, get_entry_handler, health_handler,
    ignore_handler, list_handler, policy_handler, prefetch_handler, remove_entry_handler,
    stats_handler, version_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /cache` - List cached pages
/// - `DELETE /cache` - Remove every cached page
/// - `GET /cache/entry?key=` - Read one page through the cache
/// - `DELETE /cache/entry?key=` - Remove one page
/// - `GET /cache/stats` - Cache statistics
/// - `POST /prefetch` - Start a prefetch
/// - `GET /policy` - Enable flag, ignore list and version token
/// - `PUT /ignore`, `PUT /accept` - Edit the ignore list
/// - `PUT /version` - Set or clear the version token
/// - `PUT /enabled` - Turn caching on or off
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin, so a browser diagnostics panel can poll it
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/cache", get(list_handler).delete(clear_handler))
        .route(
            "/cache/entry",
            get(get_entry_handler).delete(remove_entry_handler),
        )
        .route("/cache/stats", get(stats_handler))
        .route("/prefetch", post(prefetch_handler))
        .route("/policy", get(policy_handler))
        .route("/ignore", put(ignore_handler))
        .route("/accept", put(accept_handler))
        .route("/version", put(version_handler))
        .route("/enabled", put(enabled_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
