//! Highlight repository implementation

#![allow(clippy::cast_possible_wrap)] // SQLite uses i64 for LIMIT

use crate::error::{Error, Result};
use crate::models::{Highlight, HighlightDraft, HighlightId, MergeConflict};
use rusqlite::types::Type;
use rusqlite::{params, Connection};

/// Trait for highlight storage operations
pub trait HighlightRepository {
    /// Allocate a new highlight with the given fields.
    ///
    /// No database write happens here: the returned draft stays mutable and
    /// invisible to readers until [`save`](Self::save) commits it.
    fn insert(&self, text: &str, tags: &str) -> HighlightDraft;

    /// Durably commit a draft's current field values.
    ///
    /// The first save inserts the record; saving an already-committed draft
    /// behaves like an editor save of the same record (stamps `updated_at`).
    fn save(&self, draft: &mut HighlightDraft) -> Result<Highlight>;

    /// Drop a draft that was never committed.
    ///
    /// Returns `true` if the draft was uncommitted and is now gone without
    /// ever touching the store; `false` if it had already been saved (the
    /// stored record is left alone).
    fn discard_if_uncommitted(&self, draft: HighlightDraft) -> bool;

    /// Get a highlight by ID
    fn get(&self, id: &HighlightId) -> Result<Option<Highlight>>;

    /// List all highlights, newest first by creation time
    fn list(&self) -> Result<Vec<Highlight>>;

    /// Save edited text/tags for an existing highlight, stamping `updated_at`
    fn update(&self, id: &HighlightId, text: &str, tags: &str) -> Result<Highlight>;

    /// Permanently delete a highlight
    fn delete(&self, id: &HighlightId) -> Result<()>;

    /// List highlight IDs matching a prefix, newest first
    fn list_ids_by_prefix(&self, prefix: &str, limit: usize) -> Result<Vec<String>>;

    /// List recorded merge conflicts, newest first
    fn list_conflicts(&self, limit: usize) -> Result<Vec<MergeConflict>>;
}

/// SQLite implementation of `HighlightRepository`
pub struct SqliteHighlightRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteHighlightRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Parse a highlight from a database row
    fn parse_highlight(row: &rusqlite::Row<'_>) -> rusqlite::Result<Highlight> {
        let id: String = row.get(0)?;
        Ok(Highlight {
            id: id
                .parse()
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?,
            text: row.get(1)?,
            tags: row.get(2)?,
            created_at: row.get(3)?,
            updated_at: row.get(4)?,
            source_app: row.get(5)?,
        })
    }

    fn insert_row(&self, highlight: &Highlight) -> Result<()> {
        self.conn.execute(
            "INSERT INTO highlights (id, text, tags, created_at, updated_at, source_app)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                highlight.id.as_str(),
                highlight.text,
                highlight.tags,
                highlight.created_at,
                highlight.updated_at,
                highlight.source_app,
            ],
        )?;
        Ok(())
    }
}

impl HighlightRepository for SqliteHighlightRepository<'_> {
    fn insert(&self, text: &str, tags: &str) -> HighlightDraft {
        HighlightDraft::new(Highlight::new(text, tags))
    }

    fn save(&self, draft: &mut HighlightDraft) -> Result<Highlight> {
        if draft.is_committed() {
            let highlight = draft.highlight().clone();
            return self.update(&highlight.id, &highlight.text, &highlight.tags);
        }

        self.insert_row(draft.highlight())?;
        draft.mark_committed();
        tracing::debug!("Committed highlight {}", draft.id());
        Ok(draft.highlight().clone())
    }

    fn discard_if_uncommitted(&self, draft: HighlightDraft) -> bool {
        if draft.is_committed() {
            return false;
        }
        tracing::debug!("Discarded uncommitted highlight {}", draft.id());
        true
    }

    fn get(&self, id: &HighlightId) -> Result<Option<Highlight>> {
        let result = self.conn.query_row(
            "SELECT id, text, tags, created_at, updated_at, source_app
             FROM highlights WHERE id = ?",
            params![id.as_str()],
            Self::parse_highlight,
        );

        match result {
            Ok(highlight) => Ok(Some(highlight)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn list(&self) -> Result<Vec<Highlight>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, text, tags, created_at, updated_at, source_app
             FROM highlights
             ORDER BY created_at DESC",
        )?;

        let highlights = stmt
            .query_map([], Self::parse_highlight)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(highlights)
    }

    fn update(&self, id: &HighlightId, text: &str, tags: &str) -> Result<Highlight> {
        let now = chrono::Utc::now().timestamp_millis();

        let rows = self.conn.execute(
            "UPDATE highlights SET text = ?, tags = ?, updated_at = ? WHERE id = ?",
            params![text, tags, now, id.as_str()],
        )?;

        if rows == 0 {
            return Err(Error::NotFound(id.to_string()));
        }

        self.get(id)?.ok_or_else(|| Error::NotFound(id.to_string()))
    }

    fn delete(&self, id: &HighlightId) -> Result<()> {
        let rows = self
            .conn
            .execute("DELETE FROM highlights WHERE id = ?", params![id.as_str()])?;

        if rows == 0 {
            return Err(Error::NotFound(id.to_string()));
        }

        Ok(())
    }

    fn list_ids_by_prefix(&self, prefix: &str, limit: usize) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT id FROM highlights
             WHERE id LIKE ?
             ORDER BY created_at DESC
             LIMIT ?",
        )?;

        let ids = stmt
            .query_map(params![format!("{prefix}%"), limit as i64], |row| {
                row.get::<_, String>(0)
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(ids)
    }

    fn list_conflicts(&self, limit: usize) -> Result<Vec<MergeConflict>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, highlight_id, overwritten_updated_at, incoming_updated_at,
                    resolved_at, strategy
             FROM merge_conflicts
             ORDER BY resolved_at DESC, id DESC
             LIMIT ?",
        )?;

        let conflicts = stmt
            .query_map(params![limit as i64], |row| {
                Ok(MergeConflict {
                    id: row.get(0)?,
                    highlight_id: row.get(1)?,
                    overwritten_updated_at: row.get(2)?,
                    incoming_updated_at: row.get(3)?,
                    resolved_at: row.get(4)?,
                    strategy: row.get(5)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(conflicts)
    }
}
