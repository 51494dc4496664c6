use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Offence {
    OnTime,
    LateDrop,
    #[serde(rename = "5_10_late")]
    FiveToTenLate,
    #[serde(rename = "10_late")]
    TenPlusLate,
    NoShow,
}

impl Offence {
    pub fn points(&self) -> i64 {
        match self {
            Offence::OnTime => 0,
            Offence::LateDrop => 2,
            Offence::FiveToTenLate => 3,
            Offence::TenPlusLate => 5,
            Offence::NoShow => 7,
        }
    }

    pub fn warnings(&self) -> i64 {
        match self {
            Offence::OnTime | Offence::LateDrop => 0,
            Offence::FiveToTenLate => 1,
            Offence::TenPlusLate => 2,
            Offence::NoShow => 3,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Offence::OnTime => "On Time",
            Offence::LateDrop => "Late Drop Out",
            Offence::FiveToTenLate => "5-10 Min Late",
            Offence::TenPlusLate => "10+ Min Late",
            Offence::NoShow => "No Show",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Gold,   // 0 points
    Silver, // 1-3
    Bronze, // 4-6
    White,  // 7-11
    Black,  // 12+
}

impl Tier {
    pub fn from_points(points: i64) -> Self {
        if points <= 0 {
            Tier::Gold
        } else if points <= 3 {
            Tier::Silver
        } else if points <= 6 {
            Tier::Bronze
        } else if points <= 11 {
            Tier::White
        } else {
            Tier::Black
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Gold => "gold",
            Tier::Silver => "silver",
            Tier::Bronze => "bronze",
            Tier::White => "white",
            Tier::Black => "black",
        }
    }

    /// Unknown values fall back to silver, the tier new players start in.
    pub fn parse(value: &str) -> Self {
        match value {
            "gold" => Tier::Gold,
            "bronze" => Tier::Bronze,
            "white" => Tier::White,
            "black" => Tier::Black,
            _ => Tier::Silver,
        }
    }

    pub fn is_banned(&self) -> bool {
        matches!(self, Tier::White | Tier::Black)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

/// The points total at which a player's tier next changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierThreshold {
    pub points: i64,
    pub tier: Tier,
    pub direction: Direction,
}

pub fn next_tier_threshold(points: i64) -> TierThreshold {
    let (points, tier, direction) = if points <= 0 {
        (1, Tier::Silver, Direction::Down)
    } else if points <= 3 {
        (0, Tier::Gold, Direction::Up)
    } else if points <= 6 {
        (3, Tier::Silver, Direction::Up)
    } else if points <= 11 {
        (6, Tier::Bronze, Direction::Up)
    } else {
        (11, Tier::White, Direction::Up)
    };
    TierThreshold { points, tier, direction }
}
