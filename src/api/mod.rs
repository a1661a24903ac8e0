//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

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
        .route("/start", post(start_handler))
        .route("/stop", post(stop_handler))
        .route("/toggle", post(toggle_handler))
        // Host lifecycle events
        .route("/background", post(background_handler))
        .route("/foreground", post(foreground_handler))
        .route("/elapsed", put(set_elapsed_handler))
        .route("/elapsed/edit", get(begin_edit_handler))
        .route("/reset", post(reset_handler))
        .route("/rate", put(rate_handler))
        .route("/rate/commit", post(rate_commit_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
