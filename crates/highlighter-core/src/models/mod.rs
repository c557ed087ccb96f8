//! Data models for Highlighter

mod highlight;
mod merge_conflict;

pub use highlight::{Highlight, HighlightDraft, HighlightId};
pub use merge_conflict::MergeConflict;
