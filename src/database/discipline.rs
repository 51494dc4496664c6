use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use super::models::DisciplineRecord;
use crate::allocation::PlayerId;

pub fn insert_record(
    conn: &Connection,
    player_id: PlayerId,
    game_id: i32,
    points: i64,
    reason: &str,
) -> Result<()> {
    conn.execute(
        "INSERT INTO discipline_records (player_id, game_id, points, reason) VALUES (?1, ?2, ?3, ?4)",
        params![player_id, game_id, points, reason],
    )
    .context("Failed to insert discipline record")
    .map(|_| ())
}

/// The player's latest `window` records, most recent game first.
pub fn list_recent(
    conn: &Connection,
    player_id: PlayerId,
    window: usize,
) -> Result<Vec<DisciplineRecord>> {
    let sql = "SELECT d.id, d.player_id, d.game_id, d.points, d.reason, g.game_date FROM discipline_records d JOIN games g ON g.id = d.game_id WHERE d.player_id = ?1 ORDER BY g.game_date DESC, d.id DESC LIMIT ?2";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![player_id, window as i64], |row| {
            Ok(DisciplineRecord {
                id: row.get(0)?,
                player_id: row.get(1)?,
                game_id: row.get(2)?,
                points: row.get(3)?,
                reason: row.get(4)?,
                game_date: row.get(5)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn recent_points(conn: &Connection, player_id: PlayerId, window: usize) -> Result<i64> {
    Ok(list_recent(conn, player_id, window)?
        .iter()
        .map(|record| record.points)
        .sum())
}
