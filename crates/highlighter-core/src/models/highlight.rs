//! Highlight model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// A unique identifier for a highlight, assigned client-side at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HighlightId(Uuid);

impl HighlightId {
    /// Create a new unique highlight ID
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for HighlightId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HighlightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for HighlightId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A captured text snippet with optional tags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    /// Unique identifier, immutable once assigned
    pub id: HighlightId,
    /// Captured text content
    pub text: String,
    /// Comma-separated user labels; empty string when untagged.
    /// The store treats this as an opaque string (no parsing, no dedup).
    pub tags: String,
    /// Creation timestamp (unix ms), set once
    pub created_at: i64,
    /// Last editor-save timestamp (unix ms); `None` if never edited
    pub updated_at: Option<i64>,
    /// Origin marker for share captures. Persisted but not populated by any
    /// current write path; reserved for a future capture surface.
    pub source_app: Option<String>,
}

impl Highlight {
    /// Create a new highlight with the given text and tags
    #[must_use]
    pub fn new(text: impl Into<String>, tags: impl Into<String>) -> Self {
        Self {
            id: HighlightId::new(),
            text: text.into(),
            tags: tags.into(),
            created_at: chrono::Utc::now().timestamp_millis(),
            updated_at: None,
            source_app: None,
        }
    }

    /// Check if the text is empty (whitespace-only counts as empty)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A highlight that has been inserted but not yet committed.
///
/// Mirrors the editor contract: a freshly added record stays mutable and
/// invisible to readers until the first successful save; discarding it
/// before then leaves no trace in the store.
#[derive(Debug, Clone)]
pub struct HighlightDraft {
    highlight: Highlight,
    committed: bool,
}

impl HighlightDraft {
    /// Wrap a highlight as an uncommitted draft
    #[must_use]
    pub const fn new(highlight: Highlight) -> Self {
        Self {
            highlight,
            committed: false,
        }
    }

    /// The draft's current field values
    #[must_use]
    pub const fn highlight(&self) -> &Highlight {
        &self.highlight
    }

    /// The draft's id (already allocated, stable across the commit)
    #[must_use]
    pub const fn id(&self) -> HighlightId {
        self.highlight.id
    }

    /// Replace the draft's text before commit
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.highlight.text = text.into();
    }

    /// Replace the draft's tags before commit
    pub fn set_tags(&mut self, tags: impl Into<String>) {
        self.highlight.tags = tags.into();
    }

    /// Whether the draft has been durably committed
    #[must_use]
    pub const fn is_committed(&self) -> bool {
        self.committed
    }

    pub(crate) fn mark_committed(&mut self) {
        self.committed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_id_unique() {
        let id1 = HighlightId::new();
        let id2 = HighlightId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_highlight_id_parse() {
        let id = HighlightId::new();
        let parsed: HighlightId = id.as_str().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_highlight_new() {
        let highlight = Highlight::new("some text", "work,reading");
        assert_eq!(highlight.text, "some text");
        assert_eq!(highlight.tags, "work,reading");
        assert!(highlight.created_at > 0);
        assert!(highlight.updated_at.is_none());
        assert!(highlight.source_app.is_none());
    }

    #[test]
    fn test_is_empty() {
        assert!(Highlight::new("   \n ", "").is_empty());
        assert!(!Highlight::new("hello", "").is_empty());
    }

    #[test]
    fn test_draft_starts_uncommitted() {
        let mut draft = HighlightDraft::new(Highlight::new("", ""));
        assert!(!draft.is_committed());

        draft.set_text("edited");
        draft.set_tags("later");
        assert_eq!(draft.highlight().text, "edited");
        assert_eq!(draft.highlight().tags, "later");

        draft.mark_committed();
        assert!(draft.is_committed());
    }
}
