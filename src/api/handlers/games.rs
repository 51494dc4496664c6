use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::Json,
};
use chrono::Utc;
use std::sync::Arc;

use super::{is_admin, player_identity, ApiError, AppState};
use crate::api::models::{
    DropOutResponse, GameDetail, GameItem, MessageResponse, RegistrationResponse, RosterItem,
    VenueItem,
};
use crate::database::{self, models::RegistrationStatus};
use crate::domain::Viewer;
use crate::errors::ServiceError;
use crate::services::booking::{self, Preferences};
use crate::services::team_generation::TeamSheet;
use crate::services::{SchedulingService, TeamGenerationService};

pub async fn list_venues(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<VenueItem>>, ApiError> {
    let conn = state.connection()?;
    let venues = SchedulingService::new(&state.config).list_venues(&conn)?;
    Ok(Json(venues.into_iter().map(VenueItem::from).collect()))
}

/// Upcoming games within the caller's visibility window. Admins see all.
pub async fn list_games(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<GameItem>>, ApiError> {
    let now = Utc::now().naive_utc();
    let service = SchedulingService::new(&state.config);
    let conn = state.connection()?;

    let games = if is_admin(&headers, &state.config) {
        service.upcoming(&conn, now, Viewer::Admin)?
    } else {
        let player_id = player_identity(&headers)?;
        service.upcoming_for_player(&conn, player_id, now)?
    };

    Ok(Json(games.into_iter().map(GameItem::from).collect()))
}

pub async fn get_game(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<i32>,
) -> Result<Json<GameDetail>, ApiError> {
    let conn = state.connection()?;
    let game = database::games::find_by_id(&conn, game_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound("game"))?;
    let roster = database::registrations::list_roster(&conn, game_id).map_err(ServiceError::from)?;

    Ok(Json(GameDetail {
        game: GameItem::from(game),
        registered_players: roster.into_iter().map(RosterItem::from).collect(),
    }))
}

pub async fn get_game_players(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<i32>,
) -> Result<Json<Vec<RosterItem>>, ApiError> {
    let conn = state.connection()?;
    if database::games::find_by_id(&conn, game_id)
        .map_err(ServiceError::from)?
        .is_none()
    {
        return Err(ServiceError::NotFound("game").into());
    }
    let roster = database::registrations::list_roster(&conn, game_id).map_err(ServiceError::from)?;
    Ok(Json(roster.into_iter().map(RosterItem::from).collect()))
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<i32>,
    headers: HeaderMap,
    Json(preferences): Json<Preferences>,
) -> Result<Json<RegistrationResponse>, ApiError> {
    let player_id = player_identity(&headers)?;
    let mut conn = state.connection()?;

    let registration = booking::register(&mut conn, game_id, player_id, &preferences)?;
    let message = match registration.status {
        RegistrationStatus::Confirmed => "Registered successfully",
        RegistrationStatus::Backup => "Added to backup list",
    };

    Ok(Json(RegistrationResponse {
        registration_id: registration.id,
        status: registration.status.as_str().to_string(),
        message: message.to_string(),
    }))
}

pub async fn drop_out(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<i32>,
    headers: HeaderMap,
) -> Result<Json<DropOutResponse>, ApiError> {
    let player_id = player_identity(&headers)?;
    let mut conn = state.connection()?;

    let refunded = booking::drop_out(&mut conn, game_id, player_id)?;
    Ok(Json(DropOutResponse {
        refunded,
        message: format!("Dropped out. £{:.2} refunded.", refunded as f64 / 100.0),
    }))
}

pub async fn update_preferences(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<i32>,
    headers: HeaderMap,
    Json(preferences): Json<Preferences>,
) -> Result<Json<MessageResponse>, ApiError> {
    let player_id = player_identity(&headers)?;
    let mut conn = state.connection()?;

    booking::update_preferences(&mut conn, game_id, player_id, &preferences)?;
    Ok(Json(MessageResponse {
        message: "Preferences updated".to_string(),
    }))
}

pub async fn get_teams(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<i32>,
) -> Result<Json<TeamSheet>, ApiError> {
    let conn = state.connection()?;
    let sheet = TeamGenerationService::new(&state.config).team_sheet(&conn, game_id)?;
    Ok(Json(sheet))
}
