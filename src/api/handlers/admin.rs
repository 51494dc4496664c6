use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::Json,
};
use chrono::Utc;
use log::info;
use std::sync::Arc;

use super::{require_admin, ApiError, AppState};
use crate::allocation::{AllocationResult, PlayerId};
use crate::api::models::{
    AddPlayerRequest, BalanceResponse, CreatePlayerRequest, CreatedGamesResponse, CreditRequest,
    DisciplineRecordedResponse, DisciplineRequest, GameItem, MessageResponse, PlayerItem,
    ProfileResponse, StatsRequest, VenueItem, VenueRequest,
};
use crate::database::models::PlayerStats;
use crate::services::booking::{self, PlayerUpdate};
use crate::services::completion::{CompletionOutcome, CompletionRequest};
use crate::services::discipline::TierRecalculation;
use crate::services::scheduling::{CancellationSummary, GameRequest};
use crate::services::{
    CompletionService, DisciplineService, SchedulingService, TeamGenerationService,
};

pub async fn create_player(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<CreatePlayerRequest>,
) -> Result<Json<PlayerItem>, ApiError> {
    require_admin(&headers, &state.config)?;
    let mut conn = state.connection()?;

    let player = booking::create_player(
        &mut conn,
        &request.full_name,
        request.alias.as_deref(),
        request.phone.as_deref(),
    )?;
    Ok(Json(PlayerItem::from(player)))
}

pub async fn update_stats(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<PlayerId>,
    headers: HeaderMap,
    Json(request): Json<StatsRequest>,
) -> Result<Json<PlayerItem>, ApiError> {
    require_admin(&headers, &state.config)?;
    let conn = state.connection()?;

    let player = booking::update_stats(&conn, player_id, &PlayerStats::from(request))?;
    Ok(Json(PlayerItem::from(player)))
}

pub async fn update_player(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<PlayerId>,
    headers: HeaderMap,
    Json(update): Json<PlayerUpdate>,
) -> Result<Json<ProfileResponse>, ApiError> {
    require_admin(&headers, &state.config)?;
    let mut conn = state.connection()?;

    let profile = booking::update_player(&mut conn, player_id, &update)?;
    Ok(Json(ProfileResponse::full(profile)))
}

pub async fn adjust_credits(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<PlayerId>,
    headers: HeaderMap,
    Json(request): Json<CreditRequest>,
) -> Result<Json<BalanceResponse>, ApiError> {
    require_admin(&headers, &state.config)?;
    let mut conn = state.connection()?;

    let description = request.description.as_deref().unwrap_or("Admin adjustment");
    let balance = booking::adjust_credits(&mut conn, player_id, request.amount, description)?;
    Ok(Json(BalanceResponse { player_id, balance }))
}

pub async fn create_venue(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<VenueRequest>,
) -> Result<Json<VenueItem>, ApiError> {
    require_admin(&headers, &state.config)?;
    let conn = state.connection()?;

    let venue = SchedulingService::new(&state.config).create_venue(
        &conn,
        &request.name,
        request.address.as_deref(),
        request.postcode.as_deref(),
    )?;
    Ok(Json(VenueItem::from(venue)))
}

pub async fn create_games(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<GameRequest>,
) -> Result<Json<CreatedGamesResponse>, ApiError> {
    require_admin(&headers, &state.config)?;
    let mut conn = state.connection()?;

    let service = SchedulingService::new(&state.config);
    let (series_id, games) = service.create_games(&mut conn, &request)?;
    Ok(Json(CreatedGamesResponse {
        series_id,
        games: games.into_iter().map(GameItem::from).collect(),
    }))
}

pub async fn cancel_game(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<i32>,
    headers: HeaderMap,
) -> Result<Json<CancellationSummary>, ApiError> {
    require_admin(&headers, &state.config)?;
    let mut conn = state.connection()?;

    let summary = SchedulingService::new(&state.config).cancel_game(&mut conn, game_id)?;
    Ok(Json(summary))
}

pub async fn cancel_series(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<i32>,
    headers: HeaderMap,
) -> Result<Json<CancellationSummary>, ApiError> {
    require_admin(&headers, &state.config)?;
    let mut conn = state.connection()?;

    let now = Utc::now().naive_utc();
    let summary = SchedulingService::new(&state.config).cancel_series(&mut conn, game_id, now)?;
    Ok(Json(summary))
}

pub async fn add_player(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<i32>,
    headers: HeaderMap,
    Json(request): Json<AddPlayerRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    require_admin(&headers, &state.config)?;
    let mut conn = state.connection()?;

    booking::add_player(&mut conn, game_id, request.player_id)?;
    Ok(Json(MessageResponse {
        message: "Player added".to_string(),
    }))
}

pub async fn remove_player(
    State(state): State<Arc<AppState>>,
    Path((game_id, player_id)): Path<(i32, PlayerId)>,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>, ApiError> {
    require_admin(&headers, &state.config)?;
    let conn = state.connection()?;

    booking::remove_player(&conn, game_id, player_id)?;
    Ok(Json(MessageResponse {
        message: "Player removed".to_string(),
    }))
}

pub async fn generate_teams(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<i32>,
    headers: HeaderMap,
) -> Result<Json<AllocationResult>, ApiError> {
    require_admin(&headers, &state.config)?;
    let mut conn = state.connection()?;

    info!("Admin triggered team generation for game {}", game_id);
    let result = TeamGenerationService::new(&state.config).generate(&mut conn, game_id)?;
    Ok(Json(result))
}

pub async fn complete_game(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<i32>,
    headers: HeaderMap,
    Json(request): Json<CompletionRequest>,
) -> Result<Json<CompletionOutcome>, ApiError> {
    require_admin(&headers, &state.config)?;
    let mut conn = state.connection()?;

    let now = Utc::now().naive_utc();
    let service = CompletionService::new(&state.config);
    let outcome = service.complete(&mut conn, game_id, &request, now)?;
    Ok(Json(outcome))
}

pub async fn record_discipline(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<DisciplineRequest>,
) -> Result<Json<DisciplineRecordedResponse>, ApiError> {
    require_admin(&headers, &state.config)?;
    let mut conn = state.connection()?;

    let tier = DisciplineService::new(&state.config).record_points(
        &mut conn,
        request.player_id,
        request.game_id,
        request.points,
        &request.reason,
    )?;
    Ok(Json(DisciplineRecordedResponse {
        player_id: request.player_id,
        reliability_tier: tier,
        message: format!("{} discipline points added", request.points),
    }))
}

pub async fn recalculate_tiers(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<TierRecalculation>, ApiError> {
    require_admin(&headers, &state.config)?;
    let mut conn = state.connection()?;

    let result = DisciplineService::new(&state.config).recalculate_all(&mut conn)?;
    Ok(Json(result))
}
