use highlighter_core::db::{HighlightRepository, SqliteHighlightRepository};
use highlighter_core::paths::StoreLocation;

use crate::commands::common::{
    format_highlight_lines, highlight_to_list_item, open_store, HighlightListItem,
    CLIENT_MAIN_APP,
};
use crate::error::CliError;

/// The manual refresh gesture: drain pending cross-process history, then
/// re-read and show the list.
pub fn run_refresh(as_json: bool, location: &StoreLocation) -> Result<(), CliError> {
    let db = open_store(location)?;
    let changes = db.history(CLIENT_MAIN_APP).reconcile()?;

    let repo = SqliteHighlightRepository::new(db.connection());
    let highlights = repo.list()?;

    if as_json {
        let json_items = highlights
            .iter()
            .map(highlight_to_list_item)
            .collect::<Vec<HighlightListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
        return Ok(());
    }

    println!("{} pending change(s) applied", changes.len());
    for line in format_highlight_lines(&highlights) {
        println!("{line}");
    }

    Ok(())
}
