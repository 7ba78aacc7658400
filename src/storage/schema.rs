//! Database schema definitions.

use rusqlite::{Connection, Result};

/// The complete SQL schema for the todo database.
///
/// `AUTOINCREMENT` keeps ids strictly increasing: an id freed by a delete is
/// never handed out again.
pub const SCHEMA_SQL: &str = r"
CREATE TABLE IF NOT EXISTS todos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL DEFAULT '',
    description TEXT NOT NULL DEFAULT '',
    version INTEGER NOT NULL DEFAULT 1
);
";

/// Apply pragmas and the schema to a connection.
///
/// Idempotent, safe to call on every open.
///
/// # Errors
///
/// Returns an error if a pragma or DDL statement fails.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    // WAL is a no-op for in-memory databases
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
