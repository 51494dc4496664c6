use chrono::NaiveDateTime;

use crate::allocation::PlayerId;

#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub full_name: String,
    pub alias: Option<String>,
    pub phone: Option<String>,
    pub squad_number: Option<i32>,
    pub stats: PlayerStats,
    pub overall_rating: Option<i64>,
    pub reliability_tier: String,
    pub total_goals: i64,
}

/// Component ratings set by admins. Overall is derived from these.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerStats {
    pub defending: Option<i64>,
    pub strength: Option<i64>,
    pub fitness: Option<i64>,
    pub pace: Option<i64>,
    pub decisions: Option<i64>,
    pub assisting: Option<i64>,
    pub shooting: Option<i64>,
    pub goalkeeper: Option<i64>,
}

impl PlayerStats {
    /// Sum of the outfield components; the goalkeeper rating is tracked separately.
    pub fn overall(&self) -> i64 {
        [
            self.defending,
            self.strength,
            self.fitness,
            self.pace,
            self.decisions,
            self.assisting,
            self.shooting,
        ]
        .iter()
        .map(|v| v.unwrap_or(0))
        .sum()
    }
}

#[derive(Debug, Clone)]
pub struct CreditTransaction {
    pub id: i32,
    pub player_id: PlayerId,
    pub amount: i64,
    pub kind: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Venue {
    pub id: i32,
    pub name: String,
    pub address: Option<String>,
    pub postcode: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Open,
    Completed,
    Cancelled,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Open => "open",
            GameStatus::Completed => "completed",
            GameStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "completed" => GameStatus::Completed,
            "cancelled" => GameStatus::Cancelled,
            _ => GameStatus::Open,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Game {
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
    pub status: GameStatus,
    pub series_id: Option<String>,
    pub teams_generated: bool,
    pub winning_team: Option<String>,
    pub motm_voting_ends: Option<NaiveDateTime>,
    pub confirmed_players: i64,
}

#[derive(Debug, Clone)]
pub struct NewGame {
    pub venue_id: Option<i32>,
    pub game_date: NaiveDateTime,
    pub max_players: i64,
    pub cost_per_player: i64,
    pub format: String,
    pub regularity: String,
    pub exclusivity: String,
    pub position_type: String,
    pub game_url: String,
    pub series_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationStatus {
    Confirmed,
    Backup,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Confirmed => "confirmed",
            RegistrationStatus::Backup => "backup",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "confirmed" => RegistrationStatus::Confirmed,
            _ => RegistrationStatus::Backup,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Registration {
    pub id: i32,
    pub game_id: i32,
    pub player_id: PlayerId,
    pub status: RegistrationStatus,
    pub position_preference: Option<String>,
}

/// A confirmed registration joined with the player's ratings and preferences.
#[derive(Debug, Clone)]
pub struct RosterEntry {
    pub registration_id: i32,
    pub player_id: PlayerId,
    pub full_name: String,
    pub alias: Option<String>,
    pub squad_number: Option<i32>,
    pub overall_rating: Option<i64>,
    pub defending_rating: Option<i64>,
    pub fitness_rating: Option<i64>,
    pub goalkeeper_rating: Option<i64>,
    pub position_preference: Option<String>,
    pub pairs: Vec<PlayerId>,
    pub avoids: Vec<PlayerId>,
}

#[derive(Debug, Clone)]
pub struct TeamMemberRow {
    pub team_name: String,
    pub player_id: PlayerId,
    pub full_name: String,
    pub alias: Option<String>,
    pub squad_number: Option<i32>,
    pub overall_rating: Option<i64>,
    pub defending_rating: Option<i64>,
    pub fitness_rating: Option<i64>,
    pub position_preference: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DisciplineRecord {
    pub id: i32,
    pub player_id: PlayerId,
    pub game_id: i32,
    pub points: i64,
    pub reason: String,
    pub game_date: NaiveDateTime,
}
