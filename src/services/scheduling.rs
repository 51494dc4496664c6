use chrono::NaiveDateTime;
use log::info;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::config::settings::{AppConfig, SchedulingSettings, VisibilitySettings};
use crate::database::models::{Game, NewGame, Venue};
use crate::database::{credits, games, players, registrations, venues};
use crate::domain::schedule::{self, ScheduledGame};
use crate::domain::visibility::is_visible;
use crate::domain::{Tier, Viewer};
use crate::errors::{ServiceError, ServiceResult};

const WEEKLY: &str = "weekly";
const ONE_OFF: &str = "one-off";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRequest {
    pub venue_id: Option<i32>,
    pub game_date: NaiveDateTime,
    pub max_players: i64,
    pub cost_per_player: i64,
    pub format: String,
    #[serde(default)]
    pub regularity: Option<String>,
    #[serde(default)]
    pub exclusivity: Option<String>,
    #[serde(default)]
    pub position_type: Option<String>,
}

impl GameRequest {
    fn is_weekly(&self) -> bool {
        self.regularity.as_deref() == Some(WEEKLY)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancellationSummary {
    pub games_removed: usize,
    pub refunds: usize,
}

pub struct SchedulingService {
    scheduling: SchedulingSettings,
    visibility: VisibilitySettings,
}

impl SchedulingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            scheduling: config.scheduling.clone(),
            visibility: config.visibility.clone(),
        }
    }

    pub fn create_venue(
        &self,
        conn: &Connection,
        name: &str,
        address: Option<&str>,
        postcode: Option<&str>,
    ) -> ServiceResult<Venue> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::rejected("venue name is required"));
        }
        Ok(venues::insert_venue(conn, name, address, postcode)?)
    }

    pub fn list_venues(&self, conn: &Connection) -> ServiceResult<Vec<Venue>> {
        Ok(venues::list_distinct(conn)?)
    }

    /// Creates a single game or a weekly series and returns what was stored.
    pub fn create_games(
        &self,
        conn: &mut Connection,
        request: &GameRequest,
    ) -> ServiceResult<(Option<String>, Vec<Game>)> {
        if request.max_players < 2 {
            return Err(ServiceError::rejected("a game needs at least 2 players"));
        }
        if request.cost_per_player < 0 {
            return Err(ServiceError::rejected("cost per player must not be negative"));
        }

        let tx = conn.transaction()?;

        let (base_id, planned) = if request.is_weekly() {
            let number = games::count_series(&tx)? + 1;
            let base_id = schedule::series_base_id(self.scheduling.series_prefix, number);
            let weeks = self.scheduling.series_weeks;
            let planned = schedule::weekly_series(request.game_date, weeks, &base_id);
            (Some(base_id), planned)
        } else {
            (None, schedule::one_off(request.game_date))
        };

        let mut created = Vec::with_capacity(planned.len());
        for ScheduledGame { game_date, series_id } in planned {
            let new_game = NewGame {
                venue_id: request.venue_id,
                game_date,
                max_players: request.max_players,
                cost_per_player: request.cost_per_player,
                format: request.format.clone(),
                regularity: if request.is_weekly() { WEEKLY } else { ONE_OFF }.to_string(),
                exclusivity: request.exclusivity.clone().unwrap_or_else(|| "everyone".to_string()),
                position_type: request
                    .position_type
                    .clone()
                    .unwrap_or_else(|| "outfield_gk".to_string()),
                game_url: schedule::game_url_token(),
                series_id,
            };
            let id = games::insert_game(&tx, &new_game)?;
            let game = games::find_by_id(&tx, id)?.ok_or(ServiceError::NotFound("game"))?;
            created.push(game);
        }
        tx.commit()?;

        match &base_id {
            Some(base) => info!("Created {} weekly games in series {}", created.len(), base),
            None => info!("Created one-off game {}", created[0].id),
        }
        Ok((base_id, created))
    }

    /// Refunds confirmed players and deletes the game.
    pub fn cancel_game(
        &self,
        conn: &mut Connection,
        game_id: i32,
    ) -> ServiceResult<CancellationSummary> {
        let tx = conn.transaction()?;
        let game = games::find_by_id(&tx, game_id)?.ok_or(ServiceError::NotFound("game"))?;

        let refunds = refund_and_delete(&tx, &game, &format!("Game {} cancelled", game.id))?;
        tx.commit()?;

        info!("Cancelled game {} with {} refunds", game_id, refunds);
        Ok(CancellationSummary {
            games_removed: 1,
            refunds,
        })
    }

    /// Cancels the games of this game's series that are still in the future.
    /// Past games stay untouched.
    pub fn cancel_series(
        &self,
        conn: &mut Connection,
        game_id: i32,
        now: NaiveDateTime,
    ) -> ServiceResult<CancellationSummary> {
        let tx = conn.transaction()?;
        let game = games::find_by_id(&tx, game_id)?.ok_or(ServiceError::NotFound("game"))?;
        let series_id = game
            .series_id
            .as_deref()
            .ok_or_else(|| ServiceError::rejected("game is not part of a weekly series"))?;
        let base_id = schedule::base_of(series_id).to_string();

        let future = games::list_future_in_series(&tx, &base_id, now)?;
        let mut refunds = 0;
        for game in &future {
            refunds += refund_and_delete(&tx, game, &format!("Series {} cancelled", base_id))?;
        }
        tx.commit()?;

        info!(
            "Cancelled {} future games of series {} with {} refunds",
            future.len(),
            base_id,
            refunds
        );
        Ok(CancellationSummary {
            games_removed: future.len(),
            refunds,
        })
    }

    /// Upcoming games the viewer may see, soonest first.
    pub fn upcoming(
        &self,
        conn: &Connection,
        now: NaiveDateTime,
        viewer: Viewer,
    ) -> ServiceResult<Vec<Game>> {
        let upcoming = games::list_upcoming(conn, now)?;
        Ok(upcoming
            .into_iter()
            .filter(|game| is_visible(game.game_date, now, viewer, &self.visibility))
            .collect())
    }

    pub fn upcoming_for_player(
        &self,
        conn: &Connection,
        player_id: i32,
        now: NaiveDateTime,
    ) -> ServiceResult<Vec<Game>> {
        let player = players::find_by_id(conn, player_id)?.ok_or(ServiceError::NotFound("player"))?;
        let tier = Tier::parse(&player.reliability_tier);
        self.upcoming(conn, now, Viewer::Player(tier))
    }
}

fn refund_and_delete(conn: &Connection, game: &Game, description: &str) -> ServiceResult<usize> {
    let confirmed = registrations::list_confirmed(conn, game.id)?;
    if game.cost_per_player > 0 {
        for registration in &confirmed {
            credits::apply(
                conn,
                registration.player_id,
                game.cost_per_player,
                credits::KIND_REFUND,
                description,
            )?;
        }
    }
    games::delete_game(conn, game.id)?;
    Ok(confirmed.len())
}
