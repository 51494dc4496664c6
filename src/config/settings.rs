use chrono::Duration;
use log::warn;

use crate::allocation::BalancePolicy;

pub const DEFAULT_BALANCE_MARGIN: u32 = 10;

#[derive(Debug, Clone)]
pub struct AllocationSettings {
    pub balance_policy: BalancePolicy,
}

impl Default for AllocationSettings {
    fn default() -> Self {
        Self {
            balance_policy: BalancePolicy::Always,
        }
    }
}

/// How far ahead each reliability tier can see upcoming games.
#[derive(Debug, Clone)]
pub struct VisibilitySettings {
    pub gold_hours: i64,
    pub silver_hours: i64,
    pub bronze_hours: i64,
}

impl Default for VisibilitySettings {
    fn default() -> Self {
        Self {
            gold_hours: 28 * 24,
            silver_hours: 72,
            bronze_hours: 24,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SchedulingSettings {
    pub series_weeks: u32,
    pub series_prefix: &'static str,
    pub motm_voting_hours: i64,
    pub max_extra_nominees: usize,
}

impl Default for SchedulingSettings {
    fn default() -> Self {
        Self {
            series_weeks: 26, // 6 months
            series_prefix: "TF",
            motm_voting_hours: 24,
            max_extra_nominees: 99,
        }
    }
}

impl SchedulingSettings {
    pub fn motm_voting_window(&self) -> Duration {
        Duration::hours(self.motm_voting_hours)
    }
}

#[derive(Debug, Clone)]
pub struct DisciplineSettings {
    /// Number of most recent records counted towards a player's points.
    pub window: usize,
}

impl Default for DisciplineSettings {
    fn default() -> Self {
        Self { window: 10 }
    }
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub database_path: String,
    pub admin_token: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            database_path: "footy_booking.db".to_string(),
            admin_token: "secret".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub allocation: AllocationSettings,
    pub visibility: VisibilitySettings,
    pub scheduling: SchedulingSettings,
    pub discipline: DisciplineSettings,
    pub server: ServerSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            allocation: AllocationSettings::default(),
            visibility: VisibilitySettings::default(),
            scheduling: SchedulingSettings::default(),
            discipline: DisciplineSettings::default(),
            server: ServerSettings::default(),
        }
    }

    /// Defaults overridden by `DATABASE_PATH`, `ADMIN_TOKEN` and `TEAM_BALANCE_MARGIN`.
    pub fn from_env() -> Self {
        let mut config = Self::new();

        if let Ok(path) = std::env::var("DATABASE_PATH") {
            config.server.database_path = path;
        }
        if let Ok(token) = std::env::var("ADMIN_TOKEN") {
            config.server.admin_token = token;
        }
        if let Ok(margin) = std::env::var("TEAM_BALANCE_MARGIN") {
            config.allocation.balance_policy = parse_balance_margin(&margin);
        }

        config
    }
}

fn parse_balance_margin(value: &str) -> BalancePolicy {
    match value.trim() {
        "" => {
            warn!(
                "TEAM_BALANCE_MARGIN is empty, balancing only above the default margin of {}",
                DEFAULT_BALANCE_MARGIN
            );
            BalancePolicy::Threshold {
                margin: DEFAULT_BALANCE_MARGIN,
            }
        }
        "off" | "always" => BalancePolicy::Always,
        other => match other.parse() {
            Ok(margin) => BalancePolicy::Threshold { margin },
            Err(_) => {
                warn!("Ignoring invalid TEAM_BALANCE_MARGIN '{}', always balancing", other);
                BalancePolicy::Always
            }
        },
    }
}
