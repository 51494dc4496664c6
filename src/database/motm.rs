use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::allocation::PlayerId;

pub fn replace_nominees(conn: &Connection, game_id: i32, nominees: &[PlayerId]) -> Result<()> {
    conn.execute("DELETE FROM motm_nominees WHERE game_id = ?1", params![game_id])
        .context("Failed to clear MOTM nominees")?;

    let mut stmt = conn.prepare("INSERT INTO motm_nominees (game_id, player_id) VALUES (?1, ?2)")?;
    for player_id in nominees {
        stmt.execute(params![game_id, player_id])
            .with_context(|| format!("Failed to nominate player {}", player_id))?;
    }

    Ok(())
}

pub fn list_nominees(conn: &Connection, game_id: i32) -> Result<Vec<PlayerId>> {
    let mut stmt =
        conn.prepare("SELECT player_id FROM motm_nominees WHERE game_id = ?1 ORDER BY rowid")?;
    let rows = stmt
        .query_map(params![game_id], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}
