//! Error types for highlighter-core

use thiserror::Error;

/// Result type alias using highlighter-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in highlighter-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Highlight not found
    #[error("Highlight not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Store could not be opened even after resetting its files
    #[error("Store is unrecoverable: {0}")]
    Unrecoverable(String),
}
