use highlighter_core::db::{HighlightRepository, SqliteHighlightRepository};
use highlighter_core::paths::StoreLocation;

use crate::commands::common::{
    format_highlight_lines, highlight_to_list_item, open_store, HighlightListItem,
};
use crate::error::CliError;

pub fn run_list(
    limit: Option<usize>,
    as_json: bool,
    location: &StoreLocation,
) -> Result<(), CliError> {
    let db = open_store(location)?;
    let repo = SqliteHighlightRepository::new(db.connection());

    let mut highlights = repo.list()?;
    if let Some(limit) = limit {
        highlights.truncate(limit);
    }

    if as_json {
        let json_items = highlights
            .iter()
            .map(highlight_to_list_item)
            .collect::<Vec<HighlightListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else {
        for line in format_highlight_lines(&highlights) {
            println!("{line}");
        }
    }

    Ok(())
}
