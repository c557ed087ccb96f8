//! Database migrations

use crate::error::Result;
use rusqlite::Connection;

/// Current schema version
const CURRENT_VERSION: i32 = 2;

/// Run all pending migrations
pub fn run(conn: &Connection) -> Result<()> {
    let version = get_version(conn)?;

    if version < 1 {
        migrate_v1(conn)?;
    }
    if version < 2 {
        migrate_v2(conn)?;
    }

    Ok(())
}

/// Get the current schema version
fn get_version(conn: &Connection) -> Result<i32> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
        [],
        |row| row.get::<_, i32>(0).map(|flag| flag != 0),
    )?;

    if !exists {
        return Ok(0);
    }

    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;

    Ok(version)
}

/// Migration to version 1: Initial schema
fn migrate_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "BEGIN;
         CREATE TABLE IF NOT EXISTS schema_version (
             version INTEGER PRIMARY KEY
         );
         CREATE TABLE IF NOT EXISTS highlights (
             id TEXT PRIMARY KEY,
             text TEXT NOT NULL,
             tags TEXT NOT NULL DEFAULT '',
             created_at INTEGER NOT NULL,
             updated_at INTEGER,
             source_app TEXT
         );
         CREATE INDEX IF NOT EXISTS idx_highlights_created ON highlights(created_at DESC);
         INSERT INTO schema_version (version) VALUES (1);
         COMMIT;",
    )?;

    tracing::info!("Migrated database to version 1");
    Ok(())
}

/// Migration to version 2: change-history tracking and merge-conflict ledger
///
/// The change log plus per-client cursors reproduce persistent-history
/// tracking at the application layer; the overwrite trigger records when a
/// last-writer-wins merge replaces a row carrying a newer `updated_at`
/// stamp. The write itself is allowed to proceed: the most recently
/// committing writer's values win per record.
fn migrate_v2(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "BEGIN;
         CREATE TABLE IF NOT EXISTS change_log (
             seq INTEGER PRIMARY KEY AUTOINCREMENT,
             highlight_id TEXT NOT NULL,
             op TEXT NOT NULL,
             changed_at INTEGER NOT NULL
         );
         CREATE TABLE IF NOT EXISTS history_cursors (
             client TEXT PRIMARY KEY,
             last_seq INTEGER NOT NULL
         );
         CREATE TABLE IF NOT EXISTS merge_conflicts (
             id INTEGER PRIMARY KEY AUTOINCREMENT,
             highlight_id TEXT NOT NULL,
             overwritten_updated_at INTEGER NOT NULL,
             incoming_updated_at INTEGER NOT NULL,
             resolved_at INTEGER NOT NULL,
             strategy TEXT NOT NULL
         );
         CREATE INDEX IF NOT EXISTS idx_merge_conflicts_highlight
             ON merge_conflicts(highlight_id);
         CREATE TRIGGER IF NOT EXISTS highlights_history_ai AFTER INSERT ON highlights BEGIN
             INSERT INTO change_log (highlight_id, op, changed_at)
             VALUES (NEW.id, 'insert', CAST(strftime('%s','now') AS INTEGER) * 1000);
         END;
         CREATE TRIGGER IF NOT EXISTS highlights_history_au AFTER UPDATE ON highlights BEGIN
             INSERT INTO change_log (highlight_id, op, changed_at)
             VALUES (NEW.id, 'update', CAST(strftime('%s','now') AS INTEGER) * 1000);
         END;
         CREATE TRIGGER IF NOT EXISTS highlights_history_ad AFTER DELETE ON highlights BEGIN
             INSERT INTO change_log (highlight_id, op, changed_at)
             VALUES (OLD.id, 'delete', CAST(strftime('%s','now') AS INTEGER) * 1000);
         END;
         CREATE TRIGGER IF NOT EXISTS highlights_lww_overwrite_log BEFORE UPDATE ON highlights
         FOR EACH ROW
         WHEN NEW.updated_at IS NOT NULL
             AND OLD.updated_at IS NOT NULL
             AND NEW.updated_at < OLD.updated_at
         BEGIN
             INSERT INTO merge_conflicts (
                 highlight_id,
                 overwritten_updated_at,
                 incoming_updated_at,
                 resolved_at,
                 strategy
             ) VALUES (
                 OLD.id,
                 OLD.updated_at,
                 NEW.updated_at,
                 CAST(strftime('%s','now') AS INTEGER) * 1000,
                 'lww'
             );
         END;
         INSERT INTO schema_version (version) VALUES (2);
         COMMIT;",
    )?;

    tracing::info!("Migrated database to version {CURRENT_VERSION}");
    Ok(())
}
