//! Per-user handlers: stats, preferences and live presence

use axum::{
    extract::{Path, State},
    Json,
};

use stat_service::dto::{
    PresenceResponse, SetIgnoredRequest, SettingsResponse, StatsQueryRequest,
    UpdateSettingsRequest, UserStatsResponse,
};
use stat_service::ServiceError;

use crate::extractors::{ValidatedJson, ValidatedQuery};
use crate::response::{GatewayResult, NoContent};
use crate::server::GatewayState;

use super::{UserGamePath, UserIdPath};

/// A user's stat listing with aggregates
///
/// GET /users/:user_id/stats
pub async fn get_user_stats(
    State(state): State<GatewayState>,
    Path(path): Path<UserIdPath>,
    ValidatedQuery(params): ValidatedQuery<StatsQueryRequest>,
) -> GatewayResult<Json<UserStatsResponse>> {
    let user_id = path.user_id()?;
    let query = params.to_query();

    let report = state
        .service_context()
        .accumulator()
        .user_report(user_id, &query)
        .await?;
    Ok(Json(report))
}

/// Hide or show one game in a user's stats
///
/// PUT /users/:user_id/stats/:game/ignored
pub async fn set_ignored(
    State(state): State<GatewayState>,
    Path(path): Path<UserGamePath>,
    ValidatedJson(body): ValidatedJson<SetIgnoredRequest>,
) -> GatewayResult<NoContent> {
    let user_id = path.user_id()?;
    let found = state
        .service_context()
        .accumulator()
        .set_ignored(user_id, &path.game, body.ignored)
        .await?;

    if !found {
        return Err(ServiceError::not_found("Stat", format!("{user_id}/{}", path.game)).into());
    }
    Ok(NoContent)
}

/// A user's preferences; defaults if none are stored
///
/// GET /users/:user_id/settings
pub async fn get_settings(
    State(state): State<GatewayState>,
    Path(path): Path<UserIdPath>,
) -> GatewayResult<Json<SettingsResponse>> {
    let user_id = path.user_id()?;
    let settings = state.service_context().settings().settings(user_id).await?;
    Ok(Json(settings.into()))
}

/// Change a user's preferences
///
/// PATCH /users/:user_id/settings
pub async fn update_settings(
    State(state): State<GatewayState>,
    Path(path): Path<UserIdPath>,
    ValidatedJson(body): ValidatedJson<UpdateSettingsRequest>,
) -> GatewayResult<Json<SettingsResponse>> {
    let user_id = path.user_id()?;
    let gate = state.service_context().settings();

    if let Some(graph_type) = body.graph_type {
        gate.set_graph_type(user_id, graph_type).await?;
    }
    if let Some(enabled) = body.mention_for_stats {
        gate.set_mention_for_stats(user_id, enabled).await?;
    }

    Ok(Json(gate.settings(user_id).await?.into()))
}

/// Live tracking state of a user
///
/// GET /users/:user_id/presence
pub async fn get_presence(
    State(state): State<GatewayState>,
    Path(path): Path<UserIdPath>,
) -> GatewayResult<Json<PresenceResponse>> {
    let user_id = path.user_id()?;
    let response = match state.service_context().registry().snapshot(user_id).await {
        Some(snapshot) => PresenceResponse::from(snapshot),
        None => PresenceResponse::untracked(user_id),
    };
    Ok(Json(response))
}
