use log::info;
use rusqlite::Connection;
use serde::Serialize;

use crate::allocation::{AllocationResult, PlayerId, PositionPreference, Team, TeamAllocator};
use crate::config::settings::AppConfig;
use crate::database::models::TeamMemberRow;
use crate::database::{beef, games, registrations, teams};
use crate::domain::roster::{display_name, relevant_beef, to_candidates};
use crate::errors::{ServiceError, ServiceResult};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetPlayer {
    pub player_id: PlayerId,
    pub display_name: String,
    pub squad_number: Option<i32>,
    pub is_goalkeeper: bool,
    pub overall_rating: i64,
    pub defending_rating: i64,
    pub fitness_rating: i64,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetTotals {
    pub overall: i64,
    pub defense: i64,
    pub fitness: i64,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSheet {
    pub red_team: Vec<SheetPlayer>,
    pub blue_team: Vec<SheetPlayer>,
    pub red_stats: SheetTotals,
    pub blue_stats: SheetTotals,
}

impl TeamSheet {
    fn from_rows(rows: Vec<TeamMemberRow>) -> Self {
        let mut sheet = TeamSheet::default();
        for row in rows {
            let position = row.position_preference.as_deref();
            let player = SheetPlayer {
                player_id: row.player_id,
                display_name: display_name(&row.full_name, row.alias.as_deref()),
                squad_number: row.squad_number,
                is_goalkeeper: PositionPreference::from_free_text(position).is_goalkeeper(),
                overall_rating: row.overall_rating.unwrap_or(0),
                defending_rating: row.defending_rating.unwrap_or(0),
                fitness_rating: row.fitness_rating.unwrap_or(0),
            };
            let (members, totals) = match Team::parse(&row.team_name) {
                Some(Team::Blue) => (&mut sheet.blue_team, &mut sheet.blue_stats),
                _ => (&mut sheet.red_team, &mut sheet.red_stats),
            };
            totals.overall += player.overall_rating;
            totals.defense += player.defending_rating;
            totals.fitness += player.fitness_rating;
            members.push(player);
        }
        sheet
    }

    pub fn is_empty(&self) -> bool {
        self.red_team.is_empty() && self.blue_team.is_empty()
    }
}

pub struct TeamGenerationService {
    allocator: TeamAllocator,
}

impl TeamGenerationService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            allocator: TeamAllocator::new(config.allocation.balance_policy),
        }
    }

    /// Allocates the confirmed roster and replaces any stored teams.
    pub fn generate(&self, conn: &mut Connection, game_id: i32) -> ServiceResult<AllocationResult> {
        let tx = conn.transaction()?;
        if games::find_by_id(&tx, game_id)?.is_none() {
            return Err(ServiceError::NotFound("game"));
        }

        let candidates = to_candidates(&registrations::list_roster(&tx, game_id)?);
        let beef = relevant_beef(beef::list_active(&tx)?, &candidates);
        info!(
            "Generating teams for game {} from {} players and {} beef relations ({:?})",
            game_id,
            candidates.len(),
            beef.len(),
            self.allocator.policy()
        );

        let result = self.allocator.allocate(&candidates, &beef)?;

        teams::replace_teams(&tx, game_id, &result)?;
        games::set_teams_generated(&tx, game_id, true)?;
        tx.commit()?;

        Ok(result)
    }

    pub fn team_sheet(&self, conn: &Connection, game_id: i32) -> ServiceResult<TeamSheet> {
        if games::find_by_id(conn, game_id)?.is_none() {
            return Err(ServiceError::NotFound("game"));
        }
        Ok(TeamSheet::from_rows(teams::list_team_sheet(conn, game_id)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::AllocationError;
    use crate::database::models::PlayerStats;
    use crate::database::testing::memory_db;
    use crate::services::booking::tests::{funded_player, open_game};
    use crate::services::booking::{self, Preferences};

    fn rated_player(
        conn: &mut Connection,
        game: i32,
        name: &str,
        shooting: i64,
        position: &str,
    ) -> PlayerId {
        let id = funded_player(conn, name, 1000);
        let stats = PlayerStats {
            shooting: Some(shooting),
            defending: Some(shooting / 10),
            ..PlayerStats::default()
        };
        booking::update_stats(conn, id, &stats).unwrap();
        let prefs = Preferences {
            position: Some(position.to_string()),
            ..Preferences::default()
        };
        booking::register(conn, game, id, &prefs).unwrap();
        id
    }

    #[test]
    fn test_generate_persists_teams_and_flag() {
        let (_pool, mut conn) = memory_db();
        let game = open_game(&conn, 10);
        let keeper = rated_player(&mut conn, game, "Keeper", 40, "gk");
        for (name, rating) in [("A", 80), ("B", 70), ("C", 60)] {
            rated_player(&mut conn, game, name, rating, "outfield");
        }

        let service = TeamGenerationService::new(&AppConfig::new());
        let result = service.generate(&mut conn, game).unwrap();
        assert_eq!(result.team_of(keeper), Some(Team::Red));
        assert_eq!(result.red_team.len() + result.blue_team.len(), 4);

        assert!(games::find_by_id(&conn, game).unwrap().unwrap().teams_generated);

        let sheet = service.team_sheet(&conn, game).unwrap();
        assert_eq!(sheet.red_team.len(), result.red_team.len());
        assert!(sheet.red_team[0].is_goalkeeper);
        assert_eq!(sheet.red_team[0].display_name, "Keeper");
        assert_eq!(sheet.red_stats.overall, result.red_stats.overall as i64);
        assert_eq!(sheet.blue_stats.defense, result.blue_stats.defense as i64);
    }

    #[test]
    fn test_regenerate_replaces_previous_teams() {
        let (_pool, mut conn) = memory_db();
        let game = open_game(&conn, 10);
        for (name, rating) in [("A", 80), ("B", 70), ("C", 60), ("D", 50)] {
            rated_player(&mut conn, game, name, rating, "outfield");
        }
        let service = TeamGenerationService::new(&AppConfig::new());

        let first = service.generate(&mut conn, game).unwrap();
        let second = service.generate(&mut conn, game).unwrap();
        assert_eq!(first, second);

        let sheet = service.team_sheet(&conn, game).unwrap();
        assert_eq!(sheet.red_team.len() + sheet.blue_team.len(), 4);
    }

    #[test]
    fn test_high_beef_from_storage_splits_players() {
        let (_pool, mut conn) = memory_db();
        let game = open_game(&conn, 10);
        let a = rated_player(&mut conn, game, "A", 80, "outfield");
        let b = rated_player(&mut conn, game, "B", 75, "outfield");
        rated_player(&mut conn, game, "C", 70, "outfield");
        rated_player(&mut conn, game, "D", 10, "outfield");
        beef::upsert_mutual(&conn, a, b, 4).unwrap();

        let service = TeamGenerationService::new(&AppConfig::new());
        let result = service.generate(&mut conn, game).unwrap();
        assert_ne!(result.team_of(a), result.team_of(b));
    }

    #[test]
    fn test_too_few_players_leaves_game_untouched() {
        let (_pool, mut conn) = memory_db();
        let game = open_game(&conn, 10);
        rated_player(&mut conn, game, "Alone", 50, "outfield");

        let service = TeamGenerationService::new(&AppConfig::new());
        let err = service.generate(&mut conn, game).unwrap_err();
        let expected = AllocationError::InsufficientCandidates { found: 1, required: 2 };
        assert!(matches!(err, ServiceError::Allocation(e) if e == expected));
        assert!(!games::find_by_id(&conn, game).unwrap().unwrap().teams_generated);
        assert!(service.team_sheet(&conn, game).unwrap().is_empty());
        assert!(matches!(
            service.team_sheet(&conn, game + 1),
            Err(ServiceError::NotFound(_))
        ));
    }
}
