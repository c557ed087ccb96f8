//! Database layer for Highlighter

mod connection;
mod history;
mod migrations;
mod repository;

pub use connection::{reset_store_files, Database};
pub use history::{ChangeEntry, ChangeOp, HistoryReconciler};
pub use repository::{HighlightRepository, SqliteHighlightRepository};
