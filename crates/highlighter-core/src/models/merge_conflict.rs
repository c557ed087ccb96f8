//! Merge conflict model

use serde::{Deserialize, Serialize};

/// Recorded observation of an overlapping edit resolved by strategy (LWW)
///
/// The store lets the most recently committing writer's property values win
/// atomically per record; when that overwrite replaces a row carrying a
/// newer `updated_at` stamp, a row is recorded here so the drop is at least
/// observable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeConflict {
    /// Conflict row identifier
    pub id: i64,
    /// Highlight involved in the conflict
    pub highlight_id: String,
    /// Overwritten row's `updated_at` when the conflict occurred
    pub overwritten_updated_at: i64,
    /// Incoming row's `updated_at` that won the merge
    pub incoming_updated_at: i64,
    /// Resolution timestamp (unix ms)
    pub resolved_at: i64,
    /// Resolution strategy name
    pub strategy: String,
}
