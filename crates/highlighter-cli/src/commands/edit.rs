use highlighter_core::db::{HighlightRepository, SqliteHighlightRepository};
use highlighter_core::paths::StoreLocation;

use crate::commands::common::{
    capture_editor_input_with_initial, normalize_highlight_identifier, open_store,
    resolve_highlight,
};
use crate::error::CliError;

pub fn run_edit(
    id: &str,
    tags: Option<&str>,
    location: &StoreLocation,
) -> Result<(), CliError> {
    let normalized_id = normalize_highlight_identifier(id)?;
    let db = open_store(location)?;
    let repo = SqliteHighlightRepository::new(db.connection());
    let highlight = resolve_highlight(&normalized_id, &repo)?;

    // An empty editor result cancels: the stored record stays untouched.
    let Some(edited_text) = capture_editor_input_with_initial(&highlight.text)? else {
        return Err(CliError::EmptyEditedText);
    };

    let edited_tags = tags.map_or_else(|| highlight.tags.clone(), |t| t.trim().to_string());
    if edited_text == highlight.text && edited_tags == highlight.tags {
        tracing::debug!("Edit left highlight {} unchanged", highlight.id);
        println!("{}", highlight.id);
        return Ok(());
    }

    let updated = repo.update(&highlight.id, &edited_text, &edited_tags)?;
    println!("{}", updated.id);
    Ok(())
}
