//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{
    infrastructure::dto::http::{SessionCountDto, SessionDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// List registered sessions, oldest first
pub async fn list_sessions(State(state): State<Arc<AppState>>) -> Json<Vec<SessionDto>> {
    let mut sessions = state.registry.snapshot().await;
    sessions.sort_by_key(|s| s.connected_at);

    Json(sessions.iter().map(SessionDto::from).collect())
}

/// Session counters
pub async fn count_sessions(State(state): State<Arc<AppState>>) -> Json<SessionCountDto> {
    Json(SessionCountDto {
        connected: state.registry.count().await,
        active: state.registry.active_count().await,
    })
}
