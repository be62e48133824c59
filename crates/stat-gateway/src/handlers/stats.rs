//! Process-wide stats handler

use axum::{extract::State, Json};

use stat_service::dto::SummaryResponse;

use crate::response::GatewayResult;
use crate::server::GatewayState;

/// Totals across every user
///
/// GET /stats
pub async fn summary(State(state): State<GatewayState>) -> GatewayResult<Json<SummaryResponse>> {
    Ok(Json(state.service_context().summary().await?))
}
