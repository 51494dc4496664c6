use log::{debug, info};
use rusqlite::Connection;
use serde::Serialize;

use crate::allocation::PlayerId;
use crate::config::settings::{AppConfig, DisciplineSettings};
use crate::database::models::DisciplineRecord;
use crate::database::{discipline, games, players};
use crate::domain::{next_tier_threshold, Offence, Tier, TierThreshold};
use crate::errors::{ServiceError, ServiceResult};

#[derive(Debug, Clone)]
pub struct DisciplineSummary {
    pub records: Vec<DisciplineRecord>,
    pub total_points: i64,
    pub current_tier: Tier,
    pub next_tier_at: TierThreshold,
}

/// Count of players whose tier was recomputed.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierRecalculation {
    pub players: usize,
    pub changed: usize,
}

pub struct DisciplineService {
    settings: DisciplineSettings,
}

impl DisciplineService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            settings: config.discipline.clone(),
        }
    }

    /// Stores the offence if it carries points. Returns whether anything was written.
    pub fn record(
        &self,
        conn: &Connection,
        player_id: PlayerId,
        game_id: i32,
        offence: Offence,
    ) -> ServiceResult<bool> {
        if offence.points() <= 0 {
            return Ok(false);
        }
        let reason = offence.description();
        discipline::insert_record(conn, player_id, game_id, offence.points(), reason)?;
        debug!("Recorded {:?} for player {} in game {}", offence, player_id, game_id);
        Ok(true)
    }

    pub fn points(&self, conn: &Connection, player_id: PlayerId) -> ServiceResult<i64> {
        Ok(discipline::recent_points(conn, player_id, self.settings.window)?)
    }

    /// Recomputes and stores the player's tier from their recent points.
    pub fn recalculate_tier(&self, conn: &Connection, player_id: PlayerId) -> ServiceResult<Tier> {
        let player =
            players::find_by_id(conn, player_id)?.ok_or(ServiceError::NotFound("player"))?;
        let tier = Tier::from_points(self.points(conn, player_id)?);
        if tier.as_str() != player.reliability_tier {
            players::update_tier(conn, player_id, tier)?;
            info!(
                "Player {} moved from {} to {}",
                player_id,
                player.reliability_tier,
                tier.as_str()
            );
        }
        Ok(tier)
    }

    /// Admin entry outside game completion. The tier is refreshed straight away.
    pub fn record_points(
        &self,
        conn: &mut Connection,
        player_id: PlayerId,
        game_id: i32,
        points: i64,
        reason: &str,
    ) -> ServiceResult<Tier> {
        let reason = reason.trim();
        if points <= 0 {
            return Err(ServiceError::rejected("points must be positive"));
        }
        if reason.is_empty() {
            return Err(ServiceError::rejected("reason is required"));
        }

        let tx = conn.transaction()?;
        if players::find_by_id(&tx, player_id)?.is_none() {
            return Err(ServiceError::NotFound("player"));
        }
        if games::find_by_id(&tx, game_id)?.is_none() {
            return Err(ServiceError::NotFound("game"));
        }
        discipline::insert_record(&tx, player_id, game_id, points, reason)?;
        let tier = self.recalculate_tier(&tx, player_id)?;
        tx.commit()?;

        info!("Recorded {} discipline points for player {}", points, player_id);
        Ok(tier)
    }

    pub fn recalculate_all(&self, conn: &mut Connection) -> ServiceResult<TierRecalculation> {
        let tx = conn.transaction()?;
        let ids = players::list_ids(&tx)?;
        let mut changed = 0;
        for id in &ids {
            let before = players::find_by_id(&tx, *id)?.map(|p| p.reliability_tier);
            let after = self.recalculate_tier(&tx, *id)?;
            if before.as_deref() != Some(after.as_str()) {
                changed += 1;
            }
        }
        tx.commit()?;

        info!("Recalculated tiers for {} players ({} changed)", ids.len(), changed);
        Ok(TierRecalculation {
            players: ids.len(),
            changed,
        })
    }

    pub fn summary(
        &self,
        conn: &Connection,
        player_id: PlayerId,
    ) -> ServiceResult<DisciplineSummary> {
        let player =
            players::find_by_id(conn, player_id)?.ok_or(ServiceError::NotFound("player"))?;
        let records = discipline::list_recent(conn, player_id, self.settings.window)?;
        let total_points = records.iter().map(|r| r.points).sum();

        Ok(DisciplineSummary {
            records,
            total_points,
            current_tier: Tier::parse(&player.reliability_tier),
            next_tier_at: next_tier_threshold(total_points),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::testing::memory_db;
    use crate::domain::discipline::Direction;
    use crate::services::booking::tests::{funded_player, open_game};

    fn service() -> DisciplineService {
        DisciplineService::new(&AppConfig::new())
    }

    #[test]
    fn test_on_time_is_not_recorded() {
        let (_pool, mut conn) = memory_db();
        let player = funded_player(&mut conn, "Punctual", 0);
        let game = open_game(&conn, 10);

        assert!(!service().record(&conn, player, game, Offence::OnTime).unwrap());
        assert!(service().record(&conn, player, game, Offence::LateDrop).unwrap());
        assert_eq!(service().points(&conn, player).unwrap(), 2);
    }

    #[test]
    fn test_recalculate_tier_follows_points() {
        let (_pool, mut conn) = memory_db();
        let service = service();
        let player = funded_player(&mut conn, "Latecomer", 0);
        let game = open_game(&conn, 10);

        assert_eq!(service.recalculate_tier(&conn, player).unwrap(), Tier::Gold);

        service.record(&conn, player, game, Offence::NoShow).unwrap();
        service.record(&conn, player, game, Offence::TenPlusLate).unwrap();
        assert_eq!(service.recalculate_tier(&conn, player).unwrap(), Tier::Black);

        let stored = players::find_by_id(&conn, player).unwrap().unwrap();
        assert_eq!(stored.reliability_tier, "black");
    }

    #[test]
    fn test_recalculate_all_counts_changes() {
        let (_pool, mut conn) = memory_db();
        let clean = funded_player(&mut conn, "Clean", 0);
        let sloppy = funded_player(&mut conn, "Sloppy", 0);
        let game = open_game(&conn, 10);
        service().record(&conn, sloppy, game, Offence::FiveToTenLate).unwrap();

        let result = service().recalculate_all(&mut conn).unwrap();
        assert_eq!(result.players, 2);
        // silver -> gold for the clean player, sloppy stays silver
        assert_eq!(result.changed, 1);
        assert_eq!(players::find_by_id(&conn, clean).unwrap().unwrap().reliability_tier, "gold");
    }

    #[test]
    fn test_summary() {
        let (_pool, mut conn) = memory_db();
        let player = funded_player(&mut conn, "Someone", 0);
        let game = open_game(&conn, 10);
        service().record(&conn, player, game, Offence::FiveToTenLate).unwrap();

        let summary = service().summary(&conn, player).unwrap();
        assert_eq!(summary.total_points, 3);
        assert_eq!(summary.records[0].reason, "5-10 Min Late");
        assert_eq!(summary.current_tier, Tier::Silver);
        assert_eq!(summary.next_tier_at.tier, Tier::Gold);
        assert_eq!(summary.next_tier_at.direction, Direction::Up);

        assert!(matches!(
            service().summary(&conn, player + 100),
            Err(ServiceError::NotFound(_))
        ));
    }

    #[test]
    fn test_record_points_refreshes_tier() {
        let (_pool, mut conn) = memory_db();
        let player = funded_player(&mut conn, "Repeat", 0);
        let game = open_game(&conn, 10);

        let tier = service().record_points(&mut conn, player, game, 5, " Abusive to ref ").unwrap();
        assert_eq!(tier, Tier::Bronze);
        let summary = service().summary(&conn, player).unwrap();
        assert_eq!(summary.records[0].reason, "Abusive to ref");
        assert_eq!(summary.current_tier, Tier::Bronze);
    }

    #[test]
    fn test_record_points_rejections() {
        let (_pool, mut conn) = memory_db();
        let player = funded_player(&mut conn, "Careful", 0);
        let game = open_game(&conn, 10);
        let service = service();

        assert!(matches!(
            service.record_points(&mut conn, player, game, 0, "nothing"),
            Err(ServiceError::Rejected(_))
        ));
        assert!(matches!(
            service.record_points(&mut conn, player, game, 2, "  "),
            Err(ServiceError::Rejected(_))
        ));
        assert!(matches!(
            service.record_points(&mut conn, player, game + 1, 2, "late"),
            Err(ServiceError::NotFound("game"))
        ));
        assert!(matches!(
            service.record_points(&mut conn, player + 1, game, 2, "late"),
            Err(ServiceError::NotFound("player"))
        ));
        assert_eq!(service.points(&conn, player).unwrap(), 0);
    }
}
