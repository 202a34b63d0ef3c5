//! HTTP API module
//!
//! The host side of the page: mounts, patches and removes bound elements,
//! raises navigation events and reports client status.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/elements", post(mount_handler))
        .route("/elements/:id", put(update_handler).delete(remove_handler))
        .route("/navigation/start", post(navigation_start_handler))
        .route("/navigation/stop", post(navigation_stop_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
