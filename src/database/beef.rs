use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::allocation::{BeefRelation, PlayerId};

/// Records the same rating in both directions, replacing any previous value.
pub fn upsert_mutual(
    conn: &Connection,
    first: PlayerId,
    second: PlayerId,
    rating: u8,
) -> Result<()> {
    let sql = "INSERT INTO beef (player_id, target_player_id, rating) VALUES (?1, ?2, ?3) ON CONFLICT (player_id, target_player_id) DO UPDATE SET rating = excluded.rating, updated_at = CURRENT_TIMESTAMP";

    for (from, to) in [(first, second), (second, first)] {
        conn.execute(sql, params![from, to, rating])
            .with_context(|| format!("Failed to store beef between {} and {}", from, to))?;
    }

    Ok(())
}

/// Relations strong enough to influence team allocation.
pub fn list_active(conn: &Connection) -> Result<Vec<BeefRelation>> {
    let sql = "SELECT player_id, target_player_id, rating FROM beef WHERE rating >= 2";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(BeefRelation {
                from_player: row.get(0)?,
                to_player: row.get(1)?,
                rating: row.get(2)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::players;
    use crate::database::testing::memory_db;

    #[test]
    fn test_upsert_mutual_overwrites_both_directions() {
        let (_pool, conn) = memory_db();
        let a = players::insert_player(&conn, "Roy", None, None).unwrap().id;
        let b = players::insert_player(&conn, "Patrick", None, None).unwrap().id;
        let c = players::insert_player(&conn, "Gary", None, None).unwrap().id;

        upsert_mutual(&conn, a, b, 3).unwrap();
        upsert_mutual(&conn, b, a, 5).unwrap();
        upsert_mutual(&conn, a, c, 1).unwrap();

        let mut active = list_active(&conn).unwrap();
        active.sort_by_key(|r| r.from_player);
        assert_eq!(active.len(), 2);
        assert!(active.iter().all(|r| r.rating == 5));
        assert_eq!((active[0].from_player, active[0].to_player), (a, b));
        assert_eq!((active[1].from_player, active[1].to_player), (b, a));
    }

    #[test]
    fn test_rating_out_of_range_is_rejected() {
        let (_pool, conn) = memory_db();
        let a = players::insert_player(&conn, "Roy", None, None).unwrap().id;
        let b = players::insert_player(&conn, "Patrick", None, None).unwrap().id;
        assert!(upsert_mutual(&conn, a, b, 6).is_err());
    }
}
