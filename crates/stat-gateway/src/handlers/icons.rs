//! Icon reference data handlers

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use stat_core::IconRecord;
use stat_service::dto::RegisterIconRequest;
use stat_service::ServiceError;

use crate::extractors::ValidatedJson;
use crate::response::{GatewayResult, NoContent};
use crate::server::GatewayState;

#[derive(Debug, Serialize)]
pub struct BlacklistResponse {
    pub game: String,
    pub created: bool,
}

/// Icon for a game; 404 if unknown or blacklisted
///
/// GET /icons/:game
pub async fn get_icon(
    State(state): State<GatewayState>,
    Path(game): Path<String>,
) -> GatewayResult<Json<IconRecord>> {
    let icon = state
        .service_context()
        .settings()
        .icon(&game)
        .await?
        .ok_or_else(|| ServiceError::not_found("Icon", game))?;
    Ok(Json(icon))
}

/// Register or replace a game's icon
///
/// PUT /icons/:game
pub async fn put_icon(
    State(state): State<GatewayState>,
    Path(game): Path<String>,
    ValidatedJson(body): ValidatedJson<RegisterIconRequest>,
) -> GatewayResult<NoContent> {
    let icon = IconRecord {
        game,
        location: body.location,
        color: body.color,
    };
    state.service_context().settings().register_icon(&icon).await?;
    Ok(NoContent)
}

/// Stop serving an icon for a game
///
/// PUT /icons/:game/blacklist
pub async fn blacklist_icon(
    State(state): State<GatewayState>,
    Path(game): Path<String>,
) -> GatewayResult<Json<BlacklistResponse>> {
    let created = state.service_context().settings().blacklist_icon(&game).await?;
    Ok(Json(BlacklistResponse { game, created }))
}
