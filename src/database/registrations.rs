use std::collections::HashMap;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::{Registration, RegistrationStatus, RosterEntry};
use crate::allocation::PlayerId;

const PREFERENCE_PAIR: &str = "pair";
const PREFERENCE_AVOID: &str = "avoid";

pub fn insert_registration(
    conn: &Connection,
    game_id: i32,
    player_id: PlayerId,
    status: RegistrationStatus,
    position_preference: &str,
) -> Result<Registration> {
    let sql = "INSERT INTO registrations (game_id, player_id, status, position_preference) VALUES (?1, ?2, ?3, ?4) RETURNING id, game_id, player_id, status, position_preference";

    conn.query_row(
        sql,
        params![game_id, player_id, status.as_str(), position_preference],
        parse_registration_row,
    )
    .context("Failed to insert registration")
}

fn parse_registration_row(row: &rusqlite::Row) -> rusqlite::Result<Registration> {
    let status: String = row.get(3)?;
    Ok(Registration {
        id: row.get(0)?,
        game_id: row.get(1)?,
        player_id: row.get(2)?,
        status: RegistrationStatus::parse(&status),
        position_preference: row.get(4)?,
    })
}

pub fn find_for_player(
    conn: &Connection,
    game_id: i32,
    player_id: PlayerId,
) -> Result<Option<Registration>> {
    let sql = "SELECT id, game_id, player_id, status, position_preference FROM registrations WHERE game_id = ?1 AND player_id = ?2";

    conn.query_row(sql, params![game_id, player_id], parse_registration_row)
        .optional()
        .context("Failed to query registration")
}

pub fn count_confirmed(conn: &Connection, game_id: i32) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM registrations WHERE game_id = ?1 AND status = 'confirmed'",
        params![game_id],
        |row| row.get(0),
    )
    .context("Failed to count confirmed registrations")
}

pub fn list_confirmed(conn: &Connection, game_id: i32) -> Result<Vec<Registration>> {
    let sql = "SELECT id, game_id, player_id, status, position_preference FROM registrations WHERE game_id = ?1 AND status = 'confirmed' ORDER BY registered_at, id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![game_id], parse_registration_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn update_position(
    conn: &Connection,
    registration_id: i32,
    position_preference: &str,
) -> Result<()> {
    conn.execute(
        "UPDATE registrations SET position_preference = ?1 WHERE id = ?2",
        params![position_preference, registration_id],
    )
    .context("Failed to update position preference")
    .map(|_| ())
}

/// Swaps the stored pair/avoid targets for the given lists.
pub fn replace_preferences(
    conn: &Connection,
    registration_id: i32,
    pairs: &[PlayerId],
    avoids: &[PlayerId],
) -> Result<()> {
    conn.execute(
        "DELETE FROM registration_preferences WHERE registration_id = ?1",
        params![registration_id],
    )
    .context("Failed to clear registration preferences")?;

    let mut stmt = conn.prepare(
        "INSERT INTO registration_preferences (registration_id, target_player_id, preference_type) VALUES (?1, ?2, ?3)",
    )?;
    let tagged = pairs
        .iter()
        .map(|id| (id, PREFERENCE_PAIR))
        .chain(avoids.iter().map(|id| (id, PREFERENCE_AVOID)));
    for (target, kind) in tagged {
        stmt.execute(params![registration_id, target, kind])
            .context("Failed to insert registration preference")?;
    }

    Ok(())
}

pub fn delete_registration(conn: &Connection, registration_id: i32) -> Result<bool> {
    let changed = conn
        .execute("DELETE FROM registrations WHERE id = ?1", params![registration_id])
        .context("Failed to delete registration")?;

    Ok(changed > 0)
}

fn parse_roster_row(row: &rusqlite::Row) -> rusqlite::Result<RosterEntry> {
    Ok(RosterEntry {
        registration_id: row.get(0)?,
        player_id: row.get(1)?,
        full_name: row.get(2)?,
        alias: row.get(3)?,
        squad_number: row.get(4)?,
        overall_rating: row.get(5)?,
        defending_rating: row.get(6)?,
        fitness_rating: row.get(7)?,
        goalkeeper_rating: row.get(8)?,
        position_preference: row.get(9)?,
        pairs: Vec::new(),
        avoids: Vec::new(),
    })
}

/// Confirmed players in registration order, with their pair/avoid targets.
pub fn list_roster(conn: &Connection, game_id: i32) -> Result<Vec<RosterEntry>> {
    let sql = "SELECT r.id, p.id, p.full_name, p.alias, p.squad_number, p.overall_rating, p.defending_rating, p.fitness_rating, p.goalkeeper_rating, r.position_preference FROM registrations r JOIN players p ON p.id = r.player_id WHERE r.game_id = ?1 AND r.status = 'confirmed' ORDER BY r.registered_at, r.id";

    let mut stmt = conn.prepare(sql)?;
    let mut roster = stmt
        .query_map(params![game_id], parse_roster_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to load game roster")?;

    let mut stmt = conn.prepare(
        "SELECT rp.registration_id, rp.target_player_id, rp.preference_type FROM registration_preferences rp JOIN registrations r ON r.id = rp.registration_id WHERE r.game_id = ?1 ORDER BY rp.id",
    )?;
    let preferences = stmt
        .query_map(params![game_id], |row| {
            Ok((row.get::<_, i32>(0)?, row.get::<_, PlayerId>(1)?, row.get::<_, String>(2)?))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut by_registration: HashMap<i32, &mut RosterEntry> =
        roster.iter_mut().map(|e| (e.registration_id, e)).collect();
    for (registration_id, target, kind) in preferences {
        if let Some(entry) = by_registration.get_mut(&registration_id) {
            match kind.as_str() {
                PREFERENCE_PAIR => entry.pairs.push(target),
                _ => entry.avoids.push(target),
            }
        }
    }

    Ok(roster)
}
