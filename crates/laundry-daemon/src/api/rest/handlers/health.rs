//! Health and status handlers

use crate::api::rest::state::AppState;
use crate::error::ApiResult;
use crate::storage::{NoteStorage, OrderStorage};
use axum::{extract::State, Json};
use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub version: String,
    pub uptime: String,
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        uptime: state.uptime(),
    })
}

/// Daemon status response
#[derive(Debug, Serialize)]
pub struct DaemonStatusResponse {
    pub status: String,
    pub version: String,
    pub uptime: String,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub stats: DaemonStats,
}

/// Daemon statistics
#[derive(Debug, Serialize)]
pub struct DaemonStats {
    pub total_notes: usize,
    pub total_orders: usize,
    pub live_subscribers: usize,
    pub last_event_sequence: u64,
}

/// Daemon status endpoint
pub async fn daemon_status(State(state): State<AppState>) -> ApiResult<Json<DaemonStatusResponse>> {
    let notes = state.storage.list_notes().await?;
    let orders = state.storage.list_orders().await?;

    Ok(Json(DaemonStatusResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        uptime: state.uptime(),
        started_at: state.started_at,
        stats: DaemonStats {
            total_notes: notes.len(),
            total_orders: orders.len(),
            live_subscribers: state.bus.subscriber_count(),
            last_event_sequence: state.bus.last_sequence(),
        },
    }))
}
