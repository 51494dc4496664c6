use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::allocation::{PlayerId, PositionPreference};
use crate::database::models::{DisciplineRecord, Game, Player, PlayerStats, RosterEntry, Venue};
use crate::domain::roster::display_name;
use crate::domain::{Tier, TierThreshold};
use crate::services::booking::PlayerProfile;
use crate::services::discipline::DisciplineSummary;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueItem {
    pub id: i32,
    pub name: String,
    pub address: Option<String>,
    pub postcode: Option<String>,
}

impl From<Venue> for VenueItem {
    fn from(venue: Venue) -> Self {
        Self {
            id: venue.id,
            name: venue.name,
            address: venue.address,
            postcode: venue.postcode,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameItem {
    pub id: i32,
    pub venue_id: Option<i32>,
    pub venue_name: Option<String>,
    pub game_date: NaiveDateTime,
    pub max_players: i64,
    pub cost_per_player: i64,
    pub format: String,
    pub regularity: String,
    pub exclusivity: String,
    pub position_type: String,
    pub game_url: String,
    pub status: String,
    pub series_id: Option<String>,
    pub teams_generated: bool,
    pub current_players: i64,
    pub winning_team: Option<String>,
    pub motm_voting_ends: Option<NaiveDateTime>,
}

impl From<Game> for GameItem {
    fn from(game: Game) -> Self {
        Self {
            id: game.id,
            venue_id: game.venue_id,
            venue_name: game.venue_name,
            game_date: game.game_date,
            max_players: game.max_players,
            cost_per_player: game.cost_per_player,
            format: game.format,
            regularity: game.regularity,
            exclusivity: game.exclusivity,
            position_type: game.position_type,
            game_url: game.game_url,
            status: game.status.as_str().to_string(),
            series_id: game.series_id,
            teams_generated: game.teams_generated,
            current_players: game.confirmed_players,
            winning_team: game.winning_team,
            motm_voting_ends: game.motm_voting_ends,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterItem {
    pub player_id: PlayerId,
    pub display_name: String,
    pub full_name: String,
    pub squad_number: Option<i32>,
    pub position_preference: Option<String>,
    pub is_goalkeeper: bool,
    pub pairs: Vec<PlayerId>,
    pub avoids: Vec<PlayerId>,
}

impl From<RosterEntry> for RosterItem {
    fn from(entry: RosterEntry) -> Self {
        Self {
            player_id: entry.player_id,
            display_name: display_name(&entry.full_name, entry.alias.as_deref()),
            is_goalkeeper: PositionPreference::from_free_text(entry.position_preference.as_deref())
                .is_goalkeeper(),
            full_name: entry.full_name,
            squad_number: entry.squad_number,
            position_preference: entry.position_preference,
            pairs: entry.pairs,
            avoids: entry.avoids,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDetail {
    #[serde(flatten)]
    pub game: GameItem,
    pub registered_players: Vec<RosterItem>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponse {
    pub registration_id: i32,
    pub status: String,
    pub message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DropOutResponse {
    pub refunded: i64,
    pub message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisciplineItem {
    pub id: i32,
    pub game_id: i32,
    pub points: i64,
    pub reason: String,
    pub game_date: NaiveDateTime,
}

impl From<DisciplineRecord> for DisciplineItem {
    fn from(record: DisciplineRecord) -> Self {
        Self {
            id: record.id,
            game_id: record.game_id,
            points: record.points,
            reason: record.reason,
            game_date: record.game_date,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisciplineResponse {
    pub records: Vec<DisciplineItem>,
    pub total_points: i64,
    pub current_tier: Tier,
    pub next_tier_at: TierThreshold,
}

impl From<DisciplineSummary> for DisciplineResponse {
    fn from(summary: DisciplineSummary) -> Self {
        Self {
            records: summary.records.into_iter().map(DisciplineItem::from).collect(),
            total_points: summary.total_points,
            current_tier: summary.current_tier,
            next_tier_at: summary.next_tier_at,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlayerRequest {
    pub full_name: String,
    pub alias: Option<String>,
    pub phone: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct StatsRequest {
    pub defending: Option<i64>,
    pub strength: Option<i64>,
    pub fitness: Option<i64>,
    pub pace: Option<i64>,
    pub decisions: Option<i64>,
    pub assisting: Option<i64>,
    pub shooting: Option<i64>,
    pub goalkeeper: Option<i64>,
}

impl From<StatsRequest> for PlayerStats {
    fn from(request: StatsRequest) -> Self {
        Self {
            defending: request.defending,
            strength: request.strength,
            fitness: request.fitness,
            pace: request.pace,
            decisions: request.decisions,
            assisting: request.assisting,
            shooting: request.shooting,
            goalkeeper: request.goalkeeper,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerItem {
    pub id: PlayerId,
    pub full_name: String,
    pub alias: Option<String>,
    pub phone: Option<String>,
    pub squad_number: Option<i32>,
    pub total_goals: i64,
    pub overall_rating: Option<i64>,
    pub goalkeeper_rating: Option<i64>,
    pub reliability_tier: String,
}

impl From<Player> for PlayerItem {
    fn from(player: Player) -> Self {
        Self {
            id: player.id,
            full_name: player.full_name,
            alias: player.alias,
            phone: player.phone,
            squad_number: player.squad_number,
            total_goals: player.total_goals,
            overall_rating: player.overall_rating,
            goalkeeper_rating: player.stats.goalkeeper,
            reliability_tier: player.reliability_tier,
        }
    }
}

/// Directory entry, visible to every signed-in player.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryItem {
    pub id: PlayerId,
    pub display_name: String,
    pub squad_number: Option<i32>,
    pub overall_rating: Option<i64>,
    pub total_goals: i64,
    pub reliability_tier: String,
}

impl From<Player> for DirectoryItem {
    fn from(player: Player) -> Self {
        Self {
            id: player.id,
            display_name: display_name(&player.full_name, player.alias.as_deref()),
            squad_number: player.squad_number,
            overall_rating: player.overall_rating,
            total_goals: player.total_goals,
            reliability_tier: player.reliability_tier,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub id: PlayerId,
    pub alias: Option<String>,
    pub squad_number: Option<i32>,
    pub total_goals: i64,
    pub reliability_tier: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FullProfile {
    pub id: PlayerId,
    pub full_name: String,
    pub alias: Option<String>,
    pub phone: Option<String>,
    pub squad_number: Option<i32>,
    pub total_goals: i64,
    pub reliability_tier: String,
    pub credits: i64,
    pub overall_rating: Option<i64>,
    pub defending_rating: Option<i64>,
    pub strength_rating: Option<i64>,
    pub fitness_rating: Option<i64>,
    pub pace_rating: Option<i64>,
    pub decisions_rating: Option<i64>,
    pub assisting_rating: Option<i64>,
    pub shooting_rating: Option<i64>,
    pub goalkeeper_rating: Option<i64>,
}

/// Admins and the player themself get the full record; everyone else the public part.
#[derive(Serialize)]
#[serde(untagged)]
pub enum ProfileResponse {
    Full(FullProfile),
    Public(PublicProfile),
}

impl ProfileResponse {
    pub fn full(profile: PlayerProfile) -> Self {
        let PlayerProfile { player, balance } = profile;
        ProfileResponse::Full(FullProfile {
            id: player.id,
            full_name: player.full_name,
            alias: player.alias,
            phone: player.phone,
            squad_number: player.squad_number,
            total_goals: player.total_goals,
            reliability_tier: player.reliability_tier,
            credits: balance,
            overall_rating: player.overall_rating,
            defending_rating: player.stats.defending,
            strength_rating: player.stats.strength,
            fitness_rating: player.stats.fitness,
            pace_rating: player.stats.pace,
            decisions_rating: player.stats.decisions,
            assisting_rating: player.stats.assisting,
            shooting_rating: player.stats.shooting,
            goalkeeper_rating: player.stats.goalkeeper,
        })
    }

    pub fn public(profile: PlayerProfile) -> Self {
        let player = profile.player;
        ProfileResponse::Public(PublicProfile {
            id: player.id,
            alias: player.alias,
            squad_number: player.squad_number,
            total_goals: player.total_goals,
            reliability_tier: player.reliability_tier,
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisciplineRequest {
    pub player_id: PlayerId,
    pub game_id: i32,
    pub points: i64,
    pub reason: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisciplineRecordedResponse {
    pub player_id: PlayerId,
    pub reliability_tier: Tier,
    pub message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditRequest {
    pub amount: i64,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    pub player_id: PlayerId,
    pub balance: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueRequest {
    pub name: String,
    pub address: Option<String>,
    pub postcode: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedGamesResponse {
    pub series_id: Option<String>,
    pub games: Vec<GameItem>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPlayerRequest {
    pub player_id: PlayerId,
}
