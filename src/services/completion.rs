use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use log::info;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::allocation::{PlayerId, Team};
use crate::config::settings::{AppConfig, SchedulingSettings};
use crate::database::models::GameStatus;
use crate::database::{beef, games, motm, teams};
use crate::domain::motm::seed_nominees;
use crate::domain::Offence;
use crate::errors::{ServiceError, ServiceResult};
use crate::services::discipline::DisciplineService;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisciplineEntry {
    pub player_id: PlayerId,
    #[serde(alias = "offense")]
    pub offence: Offence,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeefEntry {
    pub player1: PlayerId,
    pub player2: PlayerId,
    pub level: u8,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompletionRequest {
    pub winning_team: Option<Team>,
    #[serde(alias = "disciplineRecords")]
    pub discipline: Vec<DisciplineEntry>,
    #[serde(alias = "beefEntries")]
    pub beef: Vec<BeefEntry>,
    pub motm_nominees: Vec<PlayerId>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionOutcome {
    pub nominees: Vec<PlayerId>,
    pub discipline_recorded: usize,
    pub warnings_issued: i64,
    pub beef_recorded: usize,
    pub motm_voting_ends: NaiveDateTime,
}

pub struct CompletionService {
    scheduling: SchedulingSettings,
    discipline: DisciplineService,
}

impl CompletionService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            scheduling: config.scheduling.clone(),
            discipline: DisciplineService::new(config),
        }
    }

    /// Closes the game: stores beef and discipline, refreshes affected tiers,
    /// nominates MOTM candidates and opens the voting window.
    pub fn complete(
        &self,
        conn: &mut Connection,
        game_id: i32,
        request: &CompletionRequest,
        now: NaiveDateTime,
    ) -> ServiceResult<CompletionOutcome> {
        self.validate(request)?;

        let tx = conn.transaction()?;
        let game = games::find_by_id(&tx, game_id)?.ok_or(ServiceError::NotFound("game"))?;
        if game.status != GameStatus::Open {
            return Err(ServiceError::rejected(format!("game is already {}", game.status.as_str())));
        }

        for entry in &request.beef {
            beef::upsert_mutual(&tx, entry.player1, entry.player2, entry.level)?;
        }

        let mut penalised = BTreeSet::new();
        for entry in &request.discipline {
            if self.discipline.record(&tx, entry.player_id, game_id, entry.offence)? {
                penalised.insert(entry.player_id);
            }
        }
        for player_id in &penalised {
            self.discipline.recalculate_tier(&tx, *player_id)?;
        }

        let winners = match request.winning_team {
            Some(team) => teams::team_member_ids(&tx, game_id, team)?,
            None => Vec::new(),
        };
        let nominees = seed_nominees(&winners, &request.motm_nominees);
        motm::replace_nominees(&tx, game_id, &nominees)?;

        let motm_voting_ends = now + self.scheduling.motm_voting_window();
        games::mark_completed(
            &tx,
            game_id,
            request.winning_team.map(|t| t.as_str()),
            motm_voting_ends,
        )?;
        tx.commit()?;

        info!(
            "Completed game {} ({} discipline records, {} MOTM nominees)",
            game_id,
            penalised.len(),
            nominees.len()
        );
        Ok(CompletionOutcome {
            nominees,
            discipline_recorded: request
                .discipline
                .iter()
                .filter(|e| e.offence.points() > 0)
                .count(),
            warnings_issued: request.discipline.iter().map(|e| e.offence.warnings()).sum(),
            beef_recorded: request.beef.len(),
            motm_voting_ends,
        })
    }

    fn validate(&self, request: &CompletionRequest) -> ServiceResult<()> {
        if request.motm_nominees.len() > self.scheduling.max_extra_nominees {
            return Err(ServiceError::rejected(format!(
                "at most {} extra MOTM nominees allowed",
                self.scheduling.max_extra_nominees
            )));
        }
        for entry in &request.beef {
            if entry.player1 == entry.player2 {
                return Err(ServiceError::rejected("cannot create beef between the same player"));
            }
            if !(1..=5).contains(&entry.level) {
                return Err(ServiceError::rejected("beef level must be between 1 and 5"));
            }
        }
        Ok(())
    }
}
