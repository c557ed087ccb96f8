use highlighter_core::db::{HighlightRepository, SqliteHighlightRepository};
use highlighter_core::paths::StoreLocation;

use crate::commands::common::{normalize_highlight_identifier, open_store, resolve_highlight};
use crate::error::CliError;

pub fn run_delete(id: &str, location: &StoreLocation) -> Result<(), CliError> {
    let normalized_id = normalize_highlight_identifier(id)?;
    let db = open_store(location)?;
    let repo = SqliteHighlightRepository::new(db.connection());
    let highlight = resolve_highlight(&normalized_id, &repo)?;

    repo.delete(&highlight.id)?;
    println!("{}", highlight.id);
    Ok(())
}
