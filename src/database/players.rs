use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::{Player, PlayerStats};
use crate::allocation::PlayerId;
use crate::domain::Tier;

const PLAYER_COLUMNS: &str = "id, full_name, alias, phone, squad_number, defending_rating, \
    strength_rating, fitness_rating, pace_rating, decisions_rating, assisting_rating, \
    shooting_rating, goalkeeper_rating, overall_rating, reliability_tier, total_goals";

pub fn insert_player(
    conn: &Connection,
    full_name: &str,
    alias: Option<&str>,
    phone: Option<&str>,
) -> Result<Player> {
    let sql = format!(
        "INSERT INTO players (full_name, alias, phone) VALUES (?1, ?2, ?3) RETURNING {}",
        PLAYER_COLUMNS
    );

    conn.query_row(&sql, params![full_name, alias, phone], parse_player_row)
        .context("Failed to insert new player")
}

fn parse_player_row(row: &rusqlite::Row) -> rusqlite::Result<Player> {
    Ok(Player {
        id: row.get(0)?,
        full_name: row.get(1)?,
        alias: row.get(2)?,
        phone: row.get(3)?,
        squad_number: row.get(4)?,
        stats: PlayerStats {
            defending: row.get(5)?,
            strength: row.get(6)?,
            fitness: row.get(7)?,
            pace: row.get(8)?,
            decisions: row.get(9)?,
            assisting: row.get(10)?,
            shooting: row.get(11)?,
            goalkeeper: row.get(12)?,
        },
        overall_rating: row.get(13)?,
        reliability_tier: row.get(14)?,
        total_goals: row.get(15)?,
    })
}

pub fn find_by_id(conn: &Connection, id: PlayerId) -> Result<Option<Player>> {
    let sql = format!("SELECT {} FROM players WHERE id = ?1", PLAYER_COLUMNS);

    conn.query_row(&sql, params![id], parse_player_row)
        .optional()
        .context("Failed to query player by id")
}

/// Every player, numbered squad members first.
pub fn list_directory(conn: &Connection) -> Result<Vec<Player>> {
    let sql = format!(
        "SELECT {} FROM players ORDER BY squad_number IS NULL, squad_number, full_name, id",
        PLAYER_COLUMNS
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_player_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list players")?;

    Ok(rows)
}

pub fn list_ids(conn: &Connection) -> Result<Vec<PlayerId>> {
    let mut stmt = conn.prepare("SELECT id FROM players ORDER BY id")?;
    let rows = stmt
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// Stores the component ratings and the overall derived from them.
pub fn update_stats(conn: &Connection, id: PlayerId, stats: &PlayerStats) -> Result<bool> {
    let sql = "UPDATE players SET defending_rating = ?1, strength_rating = ?2, \
        fitness_rating = ?3, pace_rating = ?4, decisions_rating = ?5, assisting_rating = ?6, \
        shooting_rating = ?7, goalkeeper_rating = ?8, overall_rating = ?9 WHERE id = ?10";

    let changed = conn
        .execute(
            sql,
            params![
                stats.defending,
                stats.strength,
                stats.fitness,
                stats.pace,
                stats.decisions,
                stats.assisting,
                stats.shooting,
                stats.goalkeeper,
                stats.overall(),
                id
            ],
        )
        .context("Failed to update player stats")?;

    Ok(changed > 0)
}

/// Admin edit of squad details. `None` leaves the stored value alone.
pub fn update_details(
    conn: &Connection,
    id: PlayerId,
    squad_number: Option<i32>,
    phone: Option<&str>,
    total_goals: Option<i64>,
) -> Result<bool> {
    let changed = conn
        .execute(
            "UPDATE players SET squad_number = COALESCE(?1, squad_number), \
             phone = COALESCE(?2, phone), total_goals = COALESCE(?3, total_goals) WHERE id = ?4",
            params![squad_number, phone, total_goals, id],
        )
        .context("Failed to update player details")?;

    Ok(changed > 0)
}

pub fn update_tier(conn: &Connection, id: PlayerId, tier: Tier) -> Result<()> {
    conn.execute(
        "UPDATE players SET reliability_tier = ?1 WHERE id = ?2",
        params![tier.as_str(), id],
    )
    .context("Failed to update reliability tier")
    .map(|_| ())
}
