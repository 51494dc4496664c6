use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::CreditTransaction;
use crate::allocation::PlayerId;

pub const KIND_GAME_FEE: &str = "game_fee";
pub const KIND_REFUND: &str = "refund";
pub const KIND_ADMIN_ADJUSTMENT: &str = "admin_adjustment";

pub fn open_account(conn: &Connection, player_id: PlayerId) -> Result<()> {
    conn.execute(
        "INSERT INTO credits (player_id, balance) VALUES (?1, 0)",
        params![player_id],
    )
    .context("Failed to open credit account")
    .map(|_| ())
}

pub fn get_balance(conn: &Connection, player_id: PlayerId) -> Result<Option<i64>> {
    conn.query_row(
        "SELECT balance FROM credits WHERE player_id = ?1",
        params![player_id],
        |row| row.get(0),
    )
    .optional()
    .context("Failed to query credit balance")
}

/// Moves the balance by `amount` (negative to charge) and records why.
pub fn apply(
    conn: &Connection,
    player_id: PlayerId,
    amount: i64,
    kind: &str,
    description: &str,
) -> Result<i64> {
    let balance: i64 = conn
        .query_row(
            "UPDATE credits SET balance = balance + ?1 WHERE player_id = ?2 RETURNING balance",
            params![amount, player_id],
            |row| row.get(0),
        )
        .with_context(|| format!("Failed to update balance for player {}", player_id))?;

    conn.execute(
        "INSERT INTO credit_transactions (player_id, amount, kind, description) VALUES (?1, ?2, ?3, ?4)",
        params![player_id, amount, kind, description],
    )
    .context("Failed to record credit transaction")?;

    Ok(balance)
}

fn parse_transaction_row(row: &rusqlite::Row) -> rusqlite::Result<CreditTransaction> {
    Ok(CreditTransaction {
        id: row.get(0)?,
        player_id: row.get(1)?,
        amount: row.get(2)?,
        kind: row.get(3)?,
        description: row.get(4)?,
    })
}

pub fn list_transactions(conn: &Connection, player_id: PlayerId) -> Result<Vec<CreditTransaction>> {
    let sql = "SELECT id, player_id, amount, kind, description FROM credit_transactions WHERE player_id = ?1 ORDER BY id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![player_id], parse_transaction_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::players;
    use crate::database::testing::memory_db;

    #[test]
    fn test_apply_updates_balance_and_ledger() {
        let (_pool, conn) = memory_db();
        let player = players::insert_player(&conn, "Bukayo Saka", None, None).unwrap();
        open_account(&conn, player.id).unwrap();

        assert_eq!(apply(&conn, player.id, 1500, KIND_ADMIN_ADJUSTMENT, "top up").unwrap(), 1500);
        assert_eq!(apply(&conn, player.id, -600, KIND_GAME_FEE, "game 1").unwrap(), 900);
        assert_eq!(get_balance(&conn, player.id).unwrap(), Some(900));

        let ledger = list_transactions(&conn, player.id).unwrap();
        let amounts: Vec<i64> = ledger.iter().map(|t| t.amount).collect();
        assert_eq!(amounts, vec![1500, -600]);
        assert_eq!(ledger[1].kind, KIND_GAME_FEE);
    }

    #[test]
    fn test_apply_without_account_fails() {
        let (_pool, conn) = memory_db();
        assert!(apply(&conn, 42, 100, KIND_REFUND, "nobody").is_err());
        assert_eq!(get_balance(&conn, 42).unwrap(), None);
    }
}
