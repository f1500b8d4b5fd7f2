//! SQLite access.
//!
//! Connections are opened per operation against the database file named in
//! the settings; the schema is created once at startup. Layout rows carry
//! the extracted field schema redundantly (JSON plus a comma-joined name
//! list) so reads never re-parse the DOCX package.

use crate::error::ApiError;
use rusqlite::Connection;

pub fn open(db_path: &str) -> Result<Connection, ApiError> {
    Connection::open(db_path).map_err(ApiError::internal)
}

/// Creates the tables if they do not exist yet. Called once from `main`.
pub fn init_schema(db_path: &str) -> rusqlite::Result<()> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS layouts (
            id                INTEGER PRIMARY KEY AUTOINCREMENT,
            name              TEXT NOT NULL,
            description       TEXT,
            file_path         TEXT NOT NULL,
            placeholders_json TEXT NOT NULL,
            placeholders_text TEXT NOT NULL,
            creator_id        TEXT NOT NULL,
            created_at        TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE TABLE IF NOT EXISTS documents (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            title      TEXT NOT NULL,
            status     TEXT NOT NULL,
            content    TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )
}
