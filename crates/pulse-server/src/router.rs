//! Axum router construction for the Pulse server.
//!
//! Assembles the REST and `WebSocket` routes into a single [`Router`]
//! with permissive CORS for the dashboard and per-request tracing.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router.
///
/// - `GET /health` -- liveness check
/// - `GET /platforms/` -- platform table
/// - `GET /post/list/` -- upstream proxy (also without trailing slash)
/// - `GET /post/mock/` -- generated mock dataset
/// - `GET /ws/updates` -- `data_update` stream
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/platforms/", get(handlers::list_platforms))
        // Upstream proxy
        .route("/post/list/", get(handlers::list_posts))
        .route("/post/list", get(handlers::list_posts))
        // Mock data
        .route("/post/mock/", get(handlers::mock_posts))
        // WebSocket
        .route("/ws/updates", get(ws::ws_updates))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
