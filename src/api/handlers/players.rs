use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::Json,
};
use std::sync::Arc;

use super::{is_admin, player_identity, ApiError, AppState};
use crate::allocation::PlayerId;
use crate::api::models::{DirectoryItem, DisciplineResponse, ProfileResponse};
use crate::services::{booking, DisciplineService};

/// Squad directory. Requires a signed-in player or an admin.
pub async fn list_players(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<DirectoryItem>>, ApiError> {
    if !is_admin(&headers, &state.config) {
        player_identity(&headers)?;
    }
    let conn = state.connection()?;

    let players = booking::list_players(&conn)?;
    Ok(Json(players.into_iter().map(DirectoryItem::from).collect()))
}

pub async fn get_player(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<PlayerId>,
    headers: HeaderMap,
) -> Result<Json<ProfileResponse>, ApiError> {
    let full_view = is_admin(&headers, &state.config) || player_identity(&headers)? == player_id;
    let conn = state.connection()?;

    let profile = booking::player_profile(&conn, player_id)?;
    Ok(Json(if full_view {
        ProfileResponse::full(profile)
    } else {
        ProfileResponse::public(profile)
    }))
}

pub async fn get_discipline(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<PlayerId>,
) -> Result<Json<DisciplineResponse>, ApiError> {
    let conn = state.connection()?;
    let summary = DisciplineService::new(&state.config).summary(&conn, player_id)?;
    Ok(Json(DisciplineResponse::from(summary)))
}
