//! Handler modules for the admin HTTP API.

pub mod http;

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::ui::state::AppState;

/// Routes of the admin API
pub fn admin_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(http::health_check))
        .route("/api/sessions", get(http::list_sessions))
        .route("/api/sessions/count", get(http::count_sessions))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
