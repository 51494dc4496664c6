use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use super::models::Venue;

pub fn insert_venue(
    conn: &Connection,
    name: &str,
    address: Option<&str>,
    postcode: Option<&str>,
) -> Result<Venue> {
    let sql = "INSERT INTO venues (name, address, postcode) VALUES (?1, ?2, ?3) RETURNING id, name, address, postcode";

    conn.query_row(sql, params![name, address, postcode], parse_venue_row)
        .context("Failed to insert venue")
}

fn parse_venue_row(row: &rusqlite::Row) -> rusqlite::Result<Venue> {
    Ok(Venue {
        id: row.get(0)?,
        name: row.get(1)?,
        address: row.get(2)?,
        postcode: row.get(3)?,
    })
}

/// One row per venue name, the oldest entry winning.
pub fn list_distinct(conn: &Connection) -> Result<Vec<Venue>> {
    let sql = "SELECT id, name, address, postcode FROM venues WHERE id IN (SELECT MIN(id) FROM venues GROUP BY name) ORDER BY name";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], parse_venue_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::testing::memory_db;

    #[test]
    fn test_list_distinct_collapses_duplicate_names() {
        let (_pool, conn) = memory_db();
        insert_venue(&conn, "Powerleague", Some("1 High St"), None).unwrap();
        insert_venue(&conn, "Goals", None, Some("LE1 1AA")).unwrap();
        insert_venue(&conn, "Powerleague", Some("2 Low St"), None).unwrap();

        let venues = list_distinct(&conn).unwrap();
        let names: Vec<&str> = venues.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["Goals", "Powerleague"]);
        assert_eq!(venues[1].address.as_deref(), Some("1 High St"));
    }
}
