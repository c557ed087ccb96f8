//! Cross-process change history
//!
//! Every committed insert/update/delete lands in the `change_log` table via
//! triggers, giving other connections a durable log to replay. Consumers
//! register under a client name with a cursor persisted in the store, so a
//! short-lived process still observes everything the other process wrote
//! since its last reconcile.

use crate::error::{Error, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::str::FromStr;

/// Upper bound on entries drained per reconcile call; keeps the merge step
/// bounded. Anything left over is picked up by the next call.
const MAX_BATCH: i64 = 1024;

/// Kind of change recorded in the log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOp {
    Insert,
    Update,
    Delete,
}

impl FromStr for ChangeOp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "insert" => Ok(Self::Insert),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            other => Err(Error::InvalidInput(format!("unknown change op: {other}"))),
        }
    }
}

/// One committed change observed through the history log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEntry {
    /// Monotonic log position
    pub seq: i64,
    /// The affected highlight
    pub highlight_id: String,
    /// What happened to it
    pub op: ChangeOp,
    /// When the change committed (unix ms)
    pub changed_at: i64,
}

/// Per-client reconciler over the shared change log
pub struct HistoryReconciler<'a> {
    conn: &'a Connection,
    client: String,
}

impl<'a> HistoryReconciler<'a> {
    pub(crate) fn new(conn: &'a Connection, client: impl Into<String>) -> Self {
        Self {
            conn,
            client: client.into(),
        }
    }

    /// Drain pending change-history entries past this client's cursor.
    ///
    /// The first call registers the cursor at the current head: the caller's
    /// initial query already reflects everything before that point. Later
    /// calls return up to a bounded batch of newer entries, advance the
    /// cursor in the same transaction, and prune entries every registered
    /// client has consumed. Pruning advances only past the slowest cursor:
    /// a client that registers and then never reconciles again keeps the
    /// log from shrinking, so every client must reconcile on each run.
    /// Safe to call opportunistically and repeatedly.
    pub fn reconcile(&self) -> Result<Vec<ChangeEntry>> {
        let tx = self.conn.unchecked_transaction()?;

        let cursor: Option<i64> = tx
            .query_row(
                "SELECT last_seq FROM history_cursors WHERE client = ?",
                params![self.client],
                |row| row.get(0),
            )
            .optional()?;

        let Some(cursor) = cursor else {
            let head: i64 = tx.query_row(
                "SELECT COALESCE(MAX(seq), 0) FROM change_log",
                [],
                |row| row.get(0),
            )?;
            tx.execute(
                "INSERT INTO history_cursors (client, last_seq) VALUES (?, ?)",
                params![self.client, head],
            )?;
            tx.commit()?;
            tracing::debug!("Registered history client '{}' at seq {head}", self.client);
            return Ok(Vec::new());
        };

        let entries = {
            let mut stmt = tx.prepare(
                "SELECT seq, highlight_id, op, changed_at
                 FROM change_log
                 WHERE seq > ?
                 ORDER BY seq ASC
                 LIMIT ?",
            )?;
            let rows = stmt.query_map(params![cursor, MAX_BATCH], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)?,
                ))
            })?;

            let mut entries = Vec::new();
            for row in rows {
                let (seq, highlight_id, op, changed_at) = row?;
                entries.push(ChangeEntry {
                    seq,
                    highlight_id,
                    op: op.parse()?,
                    changed_at,
                });
            }
            entries
        };

        if let Some(last) = entries.last() {
            tx.execute(
                "UPDATE history_cursors SET last_seq = ? WHERE client = ?",
                params![last.seq, self.client],
            )?;
            // Entries consumed by every registered client are dead weight.
            tx.execute(
                "DELETE FROM change_log
                 WHERE seq <= (SELECT MIN(last_seq) FROM history_cursors)",
                [],
            )?;
        }

        tx.commit()?;

        if !entries.is_empty() {
            tracing::debug!(
                "Reconciled {} change(s) for client '{}'",
                entries.len(),
                self.client
            );
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Database, HighlightRepository, SqliteHighlightRepository};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_first_reconcile_registers_at_head() {
        let db = Database::open_in_memory().unwrap();
        let repo = SqliteHighlightRepository::new(db.connection());

        let mut draft = repo.insert("before registration", "");
        repo.save(&mut draft).unwrap();

        // Already visible to the initial query, so not replayed.
        let entries = db.history("app").reconcile().unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_reconcile_sees_foreign_writes() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("highlighter.db");

        let reader = Database::open(&path).unwrap();
        reader.history("app").reconcile().unwrap(); // register

        let writer = Database::open(&path).unwrap();
        let writer_repo = SqliteHighlightRepository::new(writer.connection());
        let mut first = writer_repo.insert("from share", "links");
        writer_repo.save(&mut first).unwrap();
        let mut second = writer_repo.insert("also from share", "");
        writer_repo.save(&mut second).unwrap();

        let entries = reader.history("app").reconcile().unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|entry| entry.op == ChangeOp::Insert));
        assert_eq!(entries[0].highlight_id, first.id().as_str());
        assert_eq!(entries[1].highlight_id, second.id().as_str());

        // Both records are visible to the reading connection afterwards.
        let reader_repo = SqliteHighlightRepository::new(reader.connection());
        assert_eq!(reader_repo.list().unwrap().len(), 2);

        // Drained once; nothing pending on the next call.
        assert!(reader.history("app").reconcile().unwrap().is_empty());
    }

    #[test]
    fn test_cursor_survives_reopen() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("highlighter.db");

        {
            let db = Database::open(&path).unwrap();
            db.history("app").reconcile().unwrap(); // register
        }

        {
            let writer = Database::open(&path).unwrap();
            let repo = SqliteHighlightRepository::new(writer.connection());
            let mut draft = repo.insert("written while away", "");
            repo.save(&mut draft).unwrap();
        }

        let reopened = Database::open(&path).unwrap();
        let entries = reopened.history("app").reconcile().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].op, ChangeOp::Insert);
    }

    #[test]
    fn test_update_and_delete_ops_are_replayed() {
        let db = Database::open_in_memory().unwrap();
        let repo = SqliteHighlightRepository::new(db.connection());
        db.history("app").reconcile().unwrap(); // register

        let mut draft = repo.insert("lifecycle", "");
        let saved = repo.save(&mut draft).unwrap();
        repo.update(&saved.id, "edited", "").unwrap();
        repo.delete(&saved.id).unwrap();

        let ops: Vec<ChangeOp> = db
            .history("app")
            .reconcile()
            .unwrap()
            .into_iter()
            .map(|entry| entry.op)
            .collect();
        assert_eq!(ops, vec![ChangeOp::Insert, ChangeOp::Update, ChangeOp::Delete]);
    }

    #[test]
    fn test_consumed_entries_are_pruned() {
        let db = Database::open_in_memory().unwrap();
        let repo = SqliteHighlightRepository::new(db.connection());
        db.history("app").reconcile().unwrap(); // sole registered client

        let mut draft = repo.insert("ephemeral", "");
        repo.save(&mut draft).unwrap();
        db.history("app").reconcile().unwrap();

        let remaining: i64 = db
            .connection()
            .query_row("SELECT COUNT(*) FROM change_log", [], |row| row.get(0))
            .unwrap();
        assert_eq!(remaining, 0);
    }
}
