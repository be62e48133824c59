//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::server::GatewayState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub tracked_users: usize,
    pub events_received: u64,
    pub events_applied: u64,
}

/// Liveness check with live tracking counters
///
/// GET /health
pub async fn health_check(State(state): State<GatewayState>) -> Json<HealthResponse> {
    let events = state.events();
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        tracked_users: state.service_context().registry().user_count(),
        events_received: events.received(),
        events_applied: events.applied(),
    })
}
