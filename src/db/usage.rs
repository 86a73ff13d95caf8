//! Cumulative token usage counter.
//!
//! A single row with `id = 1`. The value is advisory and never gates anything.

use crate::errors::{AppResult, DatabaseError};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

/// Current total, zero if never recorded.
pub fn load_token_usage(conn: &Connection) -> AppResult<u64> {
    let total: Option<i64> = conn
        .query_row(
            "SELECT total_tokens FROM token_usage WHERE id = 1",
            [],
            |row| row.get(0),
        )
        .optional()
        .map_err(DatabaseError::Sqlite)?;
    Ok(total.map_or(0, |t| t.max(0) as u64))
}

/// Overwrites the total.
pub fn save_token_usage(conn: &Connection, total: u64) -> AppResult<()> {
    conn.execute(
        r#"
        INSERT INTO token_usage (id, total_tokens, last_updated)
        VALUES (1, ?1, CURRENT_TIMESTAMP)
        ON CONFLICT(id) DO UPDATE SET
            total_tokens = excluded.total_tokens,
            last_updated = excluded.last_updated
        "#,
        params![total.min(i64::MAX as u64) as i64],
    )
    .map_err(DatabaseError::Sqlite)?;
    Ok(())
}

/// Adds `tokens` to the total and returns the new value.
pub fn add_token_usage(conn: &Connection, tokens: u64) -> AppResult<u64> {
    let tx = conn.unchecked_transaction().map_err(DatabaseError::Sqlite)?;
    let total = load_token_usage(&tx)?.saturating_add(tokens);
    save_token_usage(&tx, total)?;
    tx.commit().map_err(DatabaseError::Sqlite)?;

    debug!("Token usage +{} = {}", tokens, total);
    Ok(total)
}

/// Resets the total to zero.
pub fn reset_token_usage(conn: &Connection) -> AppResult<()> {
    save_token_usage(conn, 0)
}
