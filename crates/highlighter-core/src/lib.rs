//! highlighter-core - Core library for Highlighter
//!
//! This crate contains the shared models, the multi-process store, and the
//! change-history layer used by both Highlighter processes (the main app
//! and the share surface).

pub mod capture;
pub mod db;
pub mod error;
pub mod models;
pub mod paths;

pub use error::{Error, Result};
pub use models::{Highlight, HighlightDraft, HighlightId};
