use anyhow::{Context, Result};
use rusqlite::Connection;

const TABLES: [&str; 12] = [
    "motm_nominees",
    "discipline_records",
    "beef",
    "team_players",
    "teams",
    "registration_preferences",
    "registrations",
    "games",
    "venues",
    "credit_transactions",
    "credits",
    "players",
];

/// Creates any missing tables.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    let schema_sql = include_str!("schema.sql");
    let statements = split_sql_statements(schema_sql);

    for (idx, statement) in statements.iter().enumerate() {
        execute_sql(conn, statement)
            .with_context(|| format!("Failed to execute statement {}", idx + 1))?;
    }

    log::info!("Database schema ready");
    Ok(())
}

/// Drops every table and recreates the schema.
pub fn reset_database(conn: &Connection) -> Result<()> {
    for table in TABLES {
        execute_sql(conn, &format!("DROP TABLE IF EXISTS {}", table))
            .with_context(|| format!("Failed to drop table {}", table))?;
    }
    ensure_schema(conn)?;

    log::info!("Database schema reset successfully");
    Ok(())
}

fn split_sql_statements(sql: &str) -> Vec<String> {
    sql.split(';')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn execute_sql(conn: &Connection, sql: &str) -> Result<()> {
    conn.execute(sql, [])
        .context("Failed to execute SQL statement")
        .map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::connection::{create_memory_pool, get_connection};

    #[test]
    fn test_schema_is_idempotent_and_resettable() {
        let pool = create_memory_pool().unwrap();
        let conn = get_connection(&pool).unwrap();

        ensure_schema(&conn).unwrap();
        ensure_schema(&conn).unwrap();
        conn.execute("INSERT INTO venues (name) VALUES ('Goals Leicester')", []).unwrap();

        reset_database(&conn).unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM venues", [], |r| r.get(0)).unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_split_ignores_blank_statements() {
        let sql = "CREATE TABLE a (x INTEGER);\n\n;CREATE TABLE b (y INTEGER);";
        let statements = split_sql_statements(sql);
        assert_eq!(statements.len(), 2);
    }
}
