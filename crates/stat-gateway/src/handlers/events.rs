//! Event ingest handlers
//!
//! Events are only queued here; the dispatcher applies them in order.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;

use crate::events::TrackerEvent;
use crate::response::{Accepted, GatewayError, GatewayResult};
use crate::server::GatewayState;

#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub queued: usize,
}

/// Queue a single event
///
/// POST /events
pub async fn ingest_event(
    State(state): State<GatewayState>,
    payload: Result<Json<TrackerEvent>, JsonRejection>,
) -> GatewayResult<Accepted<IngestResponse>> {
    let Json(event) = payload.map_err(|e| GatewayError::invalid_event(e.body_text()))?;
    state.events().send(event).await?;
    Ok(Accepted(IngestResponse { queued: 1 }))
}

/// Queue several events; they are applied in array order
///
/// POST /events/batch
pub async fn ingest_batch(
    State(state): State<GatewayState>,
    payload: Result<Json<Vec<TrackerEvent>>, JsonRejection>,
) -> GatewayResult<Accepted<IngestResponse>> {
    let Json(events) = payload.map_err(|e| GatewayError::invalid_event(e.body_text()))?;
    let queued = events.len();
    for event in events {
        state.events().send(event).await?;
    }
    Ok(Accepted(IngestResponse { queued }))
}
