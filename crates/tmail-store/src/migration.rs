//! Database schema migrations for SQLite.
//!
//! A simple versioned migration system. Each migration transforms the schema
//! from version N-1 to N.

use rusqlite::Connection;

use crate::error::{Result, StoreError};
use crate::sqlite::now_millis;

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// Initialize or migrate the database schema.
///
/// Idempotent: safe to call on every open.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL
        )",
        [],
    )?;

    let current: u32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;

    if current > CURRENT_VERSION {
        return Err(StoreError::Migration(format!(
            "database schema version {} is newer than supported version {}",
            current, CURRENT_VERSION
        )));
    }

    if current < CURRENT_VERSION {
        let tx = conn.transaction()?;

        for version in (current + 1)..=CURRENT_VERSION {
            apply_migration(&tx, version)?;

            tx.execute(
                "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
                rusqlite::params![version, now_millis()],
            )?;
            tracing::info!(version, "applied schema migration");
        }

        tx.commit()?;
    }

    Ok(())
}

/// Apply a specific migration version.
fn apply_migration(conn: &Connection, version: u32) -> Result<()> {
    match version {
        1 => apply_v1(conn),
        _ => Err(StoreError::Migration(format!(
            "unknown migration version: {}",
            version
        ))),
    }
}

/// Migration v1: Initial schema.
fn apply_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Messages table: one row per admitted identity
        CREATE TABLE messages (
            message_id BLOB PRIMARY KEY,      -- 32 bytes, BLAKE3 of canonical_bytes
            parent_id BLOB,                   -- 32 bytes, nullable (None for roots)
            sender TEXT NOT NULL,
            recipient TEXT NOT NULL,
            time INTEGER NOT NULL,            -- author-claimed, untrusted
            content BLOB NOT NULL,
            canonical_bytes BLOB NOT NULL,    -- exact hashing input
            ingested_at INTEGER NOT NULL      -- local timestamp of ingestion
        );

        CREATE INDEX idx_messages_parent ON messages(parent_id);
        CREATE INDEX idx_messages_ingested ON messages(ingested_at);
        "#,
    )?;

    Ok(())
}
