use highlighter_core::db::{HighlightRepository, SqliteHighlightRepository};
use highlighter_core::paths::StoreLocation;

use crate::commands::common::{normalize_tags, open_store, resolve_highlight_text};
use crate::error::CliError;

pub fn run_add(
    text_parts: &[String],
    tags: Option<&str>,
    location: &StoreLocation,
) -> Result<(), CliError> {
    let db = open_store(location)?;
    let repo = SqliteHighlightRepository::new(db.connection());

    // Same lifecycle as the add sheet: the record exists as an uncommitted
    // draft while text is being produced, and canceling leaves no trace.
    let mut draft = repo.insert("", &normalize_tags(tags));

    let Some(text) = resolve_highlight_text(text_parts)? else {
        repo.discard_if_uncommitted(draft);
        return Err(CliError::EmptyContent);
    };

    draft.set_text(text);
    let saved = repo.save(&mut draft)?;

    println!("{}", saved.id);
    Ok(())
}
