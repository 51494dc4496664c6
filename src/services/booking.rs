use log::info;
use rusqlite::Connection;
use serde::Deserialize;

use crate::allocation::PlayerId;
use crate::database::models::{GameStatus, Player, PlayerStats, Registration, RegistrationStatus};
use crate::database::{credits, games, players, registrations};
use crate::errors::{ServiceError, ServiceResult};

const DEFAULT_POSITION: &str = "outfield";

/// Upper bound for a single component rating.
pub const MAX_COMPONENT_RATING: i64 = 100;

/// Position and team-mate wishes attached to a registration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub position: Option<String>,
    pub pairs: Vec<PlayerId>,
    pub avoids: Vec<PlayerId>,
}

impl Preferences {
    fn position(&self) -> &str {
        match self.position.as_deref().map(str::trim) {
            Some(position) if !position.is_empty() => position,
            _ => DEFAULT_POSITION,
        }
    }

    fn store(&self, conn: &Connection, registration_id: i32) -> ServiceResult<()> {
        registrations::replace_preferences(conn, registration_id, &self.pairs, &self.avoids)?;
        Ok(())
    }
}

/// Squad details an admin may edit. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerUpdate {
    pub squad_number: Option<i32>,
    pub phone: Option<String>,
    pub total_goals: Option<i64>,
    /// Absolute balance in pence; the difference is booked as an admin adjustment.
    pub balance: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct PlayerProfile {
    pub player: Player,
    pub balance: i64,
}

/// Creates the player together with an empty credit account.
pub fn create_player(
    conn: &mut Connection,
    full_name: &str,
    alias: Option<&str>,
    phone: Option<&str>,
) -> ServiceResult<Player> {
    let full_name = full_name.trim();
    if full_name.is_empty() {
        return Err(ServiceError::rejected("full name is required"));
    }
    let alias = alias
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .or_else(|| full_name.split_whitespace().next());

    let tx = conn.transaction()?;
    let player = players::insert_player(&tx, full_name, alias, phone)?;
    credits::open_account(&tx, player.id)?;
    tx.commit()?;

    info!("Created player {} ({})", player.id, player.full_name);
    Ok(player)
}

pub fn update_stats(
    conn: &Connection,
    player_id: PlayerId,
    stats: &PlayerStats,
) -> ServiceResult<Player> {
    let components = [
        stats.defending,
        stats.strength,
        stats.fitness,
        stats.pace,
        stats.decisions,
        stats.assisting,
        stats.shooting,
        stats.goalkeeper,
    ];
    if components
        .iter()
        .flatten()
        .any(|rating| !(0..=MAX_COMPONENT_RATING).contains(rating))
    {
        return Err(ServiceError::rejected(format!(
            "ratings must be between 0 and {}",
            MAX_COMPONENT_RATING
        )));
    }

    if !players::update_stats(conn, player_id, stats)? {
        return Err(ServiceError::NotFound("player"));
    }
    players::find_by_id(conn, player_id)?.ok_or(ServiceError::NotFound("player"))
}

/// Signed adjustment in pence. Returns the new balance.
pub fn adjust_credits(
    conn: &mut Connection,
    player_id: PlayerId,
    amount: i64,
    description: &str,
) -> ServiceResult<i64> {
    if amount == 0 {
        return Err(ServiceError::rejected("amount must not be zero"));
    }

    let tx = conn.transaction()?;
    if credits::get_balance(&tx, player_id)?.is_none() {
        return Err(ServiceError::NotFound("player"));
    }
    let balance =
        credits::apply(&tx, player_id, amount, credits::KIND_ADMIN_ADJUSTMENT, description)?;
    tx.commit()?;

    info!("Adjusted credits of player {} by {} (balance {})", player_id, amount, balance);
    Ok(balance)
}

/// Books the player onto the game. A full game puts them on the backup list
/// without charging; otherwise the game fee is taken from their balance.
pub fn register(
    conn: &mut Connection,
    game_id: i32,
    player_id: PlayerId,
    preferences: &Preferences,
) -> ServiceResult<Registration> {
    let tx = conn.transaction()?;

    let game = games::find_by_id(&tx, game_id)?.ok_or(ServiceError::NotFound("game"))?;
    if game.status != GameStatus::Open {
        return Err(ServiceError::rejected("game is not open for registration"));
    }
    if players::find_by_id(&tx, player_id)?.is_none() {
        return Err(ServiceError::NotFound("player"));
    }
    if registrations::find_for_player(&tx, game_id, player_id)?.is_some() {
        return Err(ServiceError::rejected("already registered"));
    }

    let status = if registrations::count_confirmed(&tx, game_id)? >= game.max_players {
        RegistrationStatus::Backup
    } else {
        let balance = credits::get_balance(&tx, player_id)?.unwrap_or(0);
        if balance < game.cost_per_player {
            return Err(ServiceError::rejected("insufficient credits"));
        }
        credits::apply(
            &tx,
            player_id,
            -game.cost_per_player,
            credits::KIND_GAME_FEE,
            &format!("Registration for game {}", game_id),
        )?;
        RegistrationStatus::Confirmed
    };

    let position = preferences.position();
    let registration =
        registrations::insert_registration(&tx, game_id, player_id, status, position)?;
    preferences.store(&tx, registration.id)?;
    tx.commit()?;

    info!("Player {} registered for game {} as {}", player_id, game_id, status.as_str());
    Ok(registration)
}

/// Removes the registration and refunds a confirmed place. Not allowed once
/// teams exist.
pub fn drop_out(conn: &mut Connection, game_id: i32, player_id: PlayerId) -> ServiceResult<i64> {
    let tx = conn.transaction()?;

    let game = games::find_by_id(&tx, game_id)?.ok_or(ServiceError::NotFound("game"))?;
    if game.teams_generated {
        return Err(ServiceError::rejected("cannot drop out, teams already generated"));
    }
    let registration = registrations::find_for_player(&tx, game_id, player_id)?
        .ok_or(ServiceError::NotFound("registration"))?;

    let refund = match registration.status {
        RegistrationStatus::Confirmed => {
            credits::apply(
                &tx,
                player_id,
                game.cost_per_player,
                credits::KIND_REFUND,
                &format!("Dropped out of game {}", game_id),
            )?;
            game.cost_per_player
        }
        RegistrationStatus::Backup => 0,
    };
    registrations::delete_registration(&tx, registration.id)?;
    tx.commit()?;

    info!("Player {} dropped out of game {} (refund {})", player_id, game_id, refund);
    Ok(refund)
}

pub fn update_preferences(
    conn: &mut Connection,
    game_id: i32,
    player_id: PlayerId,
    preferences: &Preferences,
) -> ServiceResult<()> {
    let tx = conn.transaction()?;
    let registration = registrations::find_for_player(&tx, game_id, player_id)?
        .ok_or(ServiceError::NotFound("registration"))?;

    registrations::update_position(&tx, registration.id, preferences.position())?;
    preferences.store(&tx, registration.id)?;
    tx.commit()?;

    Ok(())
}

/// Admin booking: confirmed as an outfielder, no charge.
pub fn add_player(
    conn: &mut Connection,
    game_id: i32,
    player_id: PlayerId,
) -> ServiceResult<Registration> {
    let tx = conn.transaction()?;
    if games::find_by_id(&tx, game_id)?.is_none() {
        return Err(ServiceError::NotFound("game"));
    }
    if players::find_by_id(&tx, player_id)?.is_none() {
        return Err(ServiceError::NotFound("player"));
    }
    if registrations::find_for_player(&tx, game_id, player_id)?.is_some() {
        return Err(ServiceError::rejected("already registered"));
    }

    let registration = registrations::insert_registration(
        &tx,
        game_id,
        player_id,
        RegistrationStatus::Confirmed,
        DEFAULT_POSITION,
    )?;
    tx.commit()?;

    Ok(registration)
}

pub fn list_players(conn: &Connection) -> ServiceResult<Vec<Player>> {
    Ok(players::list_directory(conn)?)
}

pub fn player_profile(conn: &Connection, player_id: PlayerId) -> ServiceResult<PlayerProfile> {
    let player = players::find_by_id(conn, player_id)?.ok_or(ServiceError::NotFound("player"))?;
    let balance = credits::get_balance(conn, player_id)?.unwrap_or(0);
    Ok(PlayerProfile { player, balance })
}

pub fn update_player(
    conn: &mut Connection,
    player_id: PlayerId,
    update: &PlayerUpdate,
) -> ServiceResult<PlayerProfile> {
    if update.squad_number.is_some_and(|n| n < 1) {
        return Err(ServiceError::rejected("squad number must be positive"));
    }
    if update.total_goals.is_some_and(|g| g < 0) {
        return Err(ServiceError::rejected("total goals cannot be negative"));
    }
    let phone = update.phone.as_deref().map(str::trim);

    let tx = conn.transaction()?;
    if !players::update_details(&tx, player_id, update.squad_number, phone, update.total_goals)? {
        return Err(ServiceError::NotFound("player"));
    }
    if let Some(target) = update.balance {
        let current = credits::get_balance(&tx, player_id)?.unwrap_or(0);
        if target != current {
            credits::apply(
                &tx,
                player_id,
                target - current,
                credits::KIND_ADMIN_ADJUSTMENT,
                "Balance set by admin",
            )?;
        }
    }
    let profile = player_profile(&tx, player_id)?;
    tx.commit()?;

    info!("Updated details of player {}", player_id);
    Ok(profile)
}

pub fn remove_player(conn: &Connection, game_id: i32, player_id: PlayerId) -> ServiceResult<()> {
    let registration = registrations::find_for_player(conn, game_id, player_id)?
        .ok_or(ServiceError::NotFound("registration"))?;
    registrations::delete_registration(conn, registration.id)?;
    Ok(())
}
