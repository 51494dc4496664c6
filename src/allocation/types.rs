use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type PlayerId = i32;
pub type Rating = u32;

pub const MIN_CANDIDATES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PositionPreference {
    Goalkeeper,
    #[default]
    Outfield,
}

impl PositionPreference {
    /// Registrations carry a free-text position field ("gk", "GK/outfield", "outfield").
    pub fn from_free_text(text: Option<&str>) -> Self {
        match text {
            Some(t) if t.to_lowercase().contains("gk") => PositionPreference::Goalkeeper,
            _ => PositionPreference::Outfield,
        }
    }

    pub fn is_goalkeeper(&self) -> bool {
        matches!(self, PositionPreference::Goalkeeper)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerCandidate {
    pub player_id: PlayerId,
    pub display_name: String,
    #[serde(default)]
    pub overall_rating: Rating,
    #[serde(default)]
    pub defending_rating: Rating,
    #[serde(default)]
    pub fitness_rating: Rating,
    #[serde(default)]
    pub goalkeeper_rating: Rating,
    #[serde(default)]
    pub position: PositionPreference,
    #[serde(default)]
    pub pairs: BTreeSet<PlayerId>,
    #[serde(default)]
    pub avoids: BTreeSet<PlayerId>,
}

impl PlayerCandidate {
    pub fn new(player_id: PlayerId, display_name: impl Into<String>) -> Self {
        Self {
            player_id,
            display_name: display_name.into(),
            overall_rating: 0,
            defending_rating: 0,
            fitness_rating: 0,
            goalkeeper_rating: 0,
            position: PositionPreference::Outfield,
            pairs: BTreeSet::new(),
            avoids: BTreeSet::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeefRelation {
    pub from_player: PlayerId,
    pub to_player: PlayerId,
    pub rating: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeefLevel {
    High, // 3+
    Low,  // 2
}

impl BeefRelation {
    pub fn level(&self) -> Option<BeefLevel> {
        match self.rating {
            r if r >= 3 => Some(BeefLevel::High),
            2 => Some(BeefLevel::Low),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Red,
    Blue,
}

impl Team {
    pub fn other(&self) -> Team {
        match self {
            Team::Red => Team::Blue,
            Team::Blue => Team::Red,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Team::Red => "red",
            Team::Blue => "blue",
        }
    }

    pub fn parse(value: &str) -> Option<Team> {
        match value.to_lowercase().as_str() {
            "red" => Some(Team::Red),
            "blue" => Some(Team::Blue),
            _ => None,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::Red => write!(f, "Red"),
            Team::Blue => write!(f, "Blue"),
        }
    }
}

/// Which step of the allocation decided a placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Rule {
    GoalkeeperSeed,
    SizeBalance,
    HighBeef,
    OverallBalance,
    PairPreference,
    AvoidPreference,
    DefenceFitnessBalance,
    LowBeef,
    SnakeDraft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub player_id: PlayerId,
    pub team: Team,
    pub rule: Rule,
}

/// Team totals, widened so a full roster of maximum ratings cannot overflow.
pub type RatingTotal = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TeamStats {
    pub overall: RatingTotal,
    pub defense: RatingTotal,
    pub fitness: RatingTotal,
}

impl TeamStats {
    pub fn with(self, player: &PlayerCandidate) -> Self {
        Self {
            overall: self.overall.saturating_add(player.overall_rating.into()),
            defense: self.defense.saturating_add(player.defending_rating.into()),
            fitness: self.fitness.saturating_add(player.fitness_rating.into()),
        }
    }

    pub fn of(players: &[PlayerCandidate]) -> Self {
        players.iter().fold(TeamStats::default(), |stats, p| stats.with(p))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationResult {
    pub red_team: Vec<PlayerCandidate>,
    pub blue_team: Vec<PlayerCandidate>,
    pub red_stats: TeamStats,
    pub blue_stats: TeamStats,
    pub placements: Vec<Placement>,
}

impl AllocationResult {
    pub fn team(&self, team: Team) -> &[PlayerCandidate] {
        match team {
            Team::Red => &self.red_team,
            Team::Blue => &self.blue_team,
        }
    }

    pub fn team_ids(&self, team: Team) -> Vec<PlayerId> {
        self.team(team).iter().map(|p| p.player_id).collect()
    }

    pub fn team_of(&self, player_id: PlayerId) -> Option<Team> {
        if self.red_team.iter().any(|p| p.player_id == player_id) {
            Some(Team::Red)
        } else if self.blue_team.iter().any(|p| p.player_id == player_id) {
            Some(Team::Blue)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AllocationError {
    #[error("Need at least {required} players to generate teams, found {found}")]
    InsufficientCandidates { found: usize, required: usize },
}

/// How rule 3 (overall rating balance) decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum BalancePolicy {
    /// Always hand the player to the lower-or-equal total.
    #[default]
    Always,
    /// Only balance when the totals differ by more than `margin`.
    Threshold { margin: Rating },
}
