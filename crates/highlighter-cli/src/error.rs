use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] highlighter_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("No highlight text provided")]
    EmptyContent,
    #[error("Edited highlight text cannot be empty")]
    EmptyEditedText,
    #[error("Highlight ID cannot be empty")]
    EmptyHighlightId,
    #[error("Highlight not found for id/prefix: {0}")]
    HighlightNotFound(String),
    #[error("{0}")]
    AmbiguousHighlightId(String),
    #[error("Editor command failed: {0}")]
    EditorFailed(String),
}
