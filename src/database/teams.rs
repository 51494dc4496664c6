use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use super::models::TeamMemberRow;
use crate::allocation::{AllocationResult, PlayerId, Team};

/// Drops any earlier teams for the game and writes Red and Blue in pick order.
pub fn replace_teams(conn: &Connection, game_id: i32, result: &AllocationResult) -> Result<()> {
    conn.execute("DELETE FROM teams WHERE game_id = ?1", params![game_id])
        .context("Failed to clear previous teams")?;

    for team in [Team::Red, Team::Blue] {
        let team_id: i64 = conn
            .query_row(
                "INSERT INTO teams (game_id, team_name) VALUES (?1, ?2) RETURNING id",
                params![game_id, team.to_string()],
                |row| row.get(0),
            )
            .with_context(|| format!("Failed to insert {} team", team))?;

        let mut stmt = conn.prepare(
            "INSERT INTO team_players (team_id, player_id, pick_order) VALUES (?1, ?2, ?3)",
        )?;
        for (pick, player) in result.team(team).iter().enumerate() {
            stmt.execute(params![team_id, player.player_id, pick as i64 + 1])
                .context("Failed to insert team member")?;
        }
    }

    Ok(())
}

fn parse_member_row(row: &rusqlite::Row) -> rusqlite::Result<TeamMemberRow> {
    Ok(TeamMemberRow {
        team_name: row.get(0)?,
        player_id: row.get(1)?,
        full_name: row.get(2)?,
        alias: row.get(3)?,
        squad_number: row.get(4)?,
        overall_rating: row.get(5)?,
        defending_rating: row.get(6)?,
        fitness_rating: row.get(7)?,
        position_preference: row.get(8)?,
    })
}

/// Both teams with player details, Red first, each in pick order.
pub fn list_team_sheet(conn: &Connection, game_id: i32) -> Result<Vec<TeamMemberRow>> {
    let sql = "SELECT t.team_name, p.id, p.full_name, p.alias, p.squad_number, p.overall_rating, p.defending_rating, p.fitness_rating, r.position_preference FROM teams t JOIN team_players tp ON tp.team_id = t.id JOIN players p ON p.id = tp.player_id LEFT JOIN registrations r ON r.game_id = t.game_id AND r.player_id = p.id WHERE t.game_id = ?1 ORDER BY t.id, tp.pick_order";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![game_id], parse_member_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn team_member_ids(conn: &Connection, game_id: i32, team: Team) -> Result<Vec<PlayerId>> {
    let sql = "SELECT tp.player_id FROM teams t JOIN team_players tp ON tp.team_id = t.id WHERE t.game_id = ?1 AND lower(t.team_name) = ?2 ORDER BY tp.pick_order";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![game_id, team.as_str()], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}
