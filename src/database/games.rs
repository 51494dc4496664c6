use std::collections::BTreeSet;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};

use super::models::{Game, GameStatus, NewGame};
use crate::domain::schedule::base_of;

const GAME_SELECT: &str = "SELECT g.id, g.venue_id, v.name, g.game_date, g.max_players, g.cost_per_player, g.format, g.regularity, g.exclusivity, g.position_type, g.game_url, g.status, g.series_id, g.teams_generated, g.winning_team, g.motm_voting_ends, (SELECT COUNT(*) FROM registrations r WHERE r.game_id = g.id AND r.status = 'confirmed') FROM games g LEFT JOIN venues v ON v.id = g.venue_id";

pub fn insert_game(conn: &Connection, game: &NewGame) -> Result<i32> {
    let sql = "INSERT INTO games (venue_id, game_date, max_players, cost_per_player, format, regularity, exclusivity, position_type, game_url, series_id) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10) RETURNING id";

    conn.query_row(
        sql,
        params![
            game.venue_id,
            game.game_date,
            game.max_players,
            game.cost_per_player,
            game.format,
            game.regularity,
            game.exclusivity,
            game.position_type,
            game.game_url,
            game.series_id
        ],
        |row| row.get(0),
    )
    .context("Failed to insert game")
}

fn parse_game_row(row: &rusqlite::Row) -> rusqlite::Result<Game> {
    let status: String = row.get(11)?;
    Ok(Game {
        id: row.get(0)?,
        venue_id: row.get(1)?,
        venue_name: row.get(2)?,
        game_date: row.get(3)?,
        max_players: row.get(4)?,
        cost_per_player: row.get(5)?,
        format: row.get(6)?,
        regularity: row.get(7)?,
        exclusivity: row.get(8)?,
        position_type: row.get(9)?,
        game_url: row.get(10)?,
        status: GameStatus::parse(&status),
        series_id: row.get(12)?,
        teams_generated: row.get(13)?,
        winning_team: row.get(14)?,
        motm_voting_ends: row.get(15)?,
        confirmed_players: row.get(16)?,
    })
}

pub fn find_by_id(conn: &Connection, id: i32) -> Result<Option<Game>> {
    let sql = format!("{} WHERE g.id = ?1", GAME_SELECT);

    conn.query_row(&sql, params![id], parse_game_row)
        .optional()
        .context("Failed to query game by id")
}

/// Games after `now` that have not been cancelled, soonest first.
pub fn list_upcoming(conn: &Connection, now: NaiveDateTime) -> Result<Vec<Game>> {
    let sql = format!(
        "{} WHERE g.game_date > ?1 AND g.status != 'cancelled' ORDER BY g.game_date",
        GAME_SELECT
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![now], parse_game_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// Number of distinct series ever created.
pub fn count_series(conn: &Connection) -> Result<i64> {
    let mut stmt =
        conn.prepare("SELECT DISTINCT series_id FROM games WHERE series_id IS NOT NULL")?;
    let tags = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let bases: BTreeSet<&str> = tags.iter().map(|tag| base_of(tag)).collect();
    Ok(bases.len() as i64)
}

pub fn list_future_in_series(
    conn: &Connection,
    base_id: &str,
    now: NaiveDateTime,
) -> Result<Vec<Game>> {
    let sql = format!(
        "{} WHERE g.series_id LIKE ?1 AND g.game_date > ?2 ORDER BY g.game_date",
        GAME_SELECT
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![format!("{}-%", base_id), now], parse_game_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn delete_game(conn: &Connection, id: i32) -> Result<bool> {
    let changed = conn
        .execute("DELETE FROM games WHERE id = ?1", params![id])
        .context("Failed to delete game")?;

    Ok(changed > 0)
}

pub fn set_teams_generated(conn: &Connection, id: i32, generated: bool) -> Result<()> {
    conn.execute(
        "UPDATE games SET teams_generated = ?1 WHERE id = ?2",
        params![generated, id],
    )
    .context("Failed to update teams_generated flag")
    .map(|_| ())
}

pub fn mark_completed(
    conn: &Connection,
    id: i32,
    winning_team: Option<&str>,
    motm_voting_ends: NaiveDateTime,
) -> Result<()> {
    conn.execute(
        "UPDATE games SET status = ?1, winning_team = ?2, motm_voting_ends = ?3 WHERE id = ?4",
        params![GameStatus::Completed.as_str(), winning_team, motm_voting_ends, id],
    )
    .context("Failed to mark game as completed")
    .map(|_| ())
}
