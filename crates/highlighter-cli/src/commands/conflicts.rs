use highlighter_core::db::{HighlightRepository, SqliteHighlightRepository};
use highlighter_core::models::MergeConflict;
use highlighter_core::paths::StoreLocation;

use crate::commands::common::open_store;
use crate::error::CliError;

pub fn run_conflicts(
    limit: usize,
    as_json: bool,
    location: &StoreLocation,
) -> Result<(), CliError> {
    let db = open_store(location)?;
    let repo = SqliteHighlightRepository::new(db.connection());
    let conflicts = repo.list_conflicts(limit)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&conflicts)?);
        return Ok(());
    }

    if conflicts.is_empty() {
        println!("No merge conflicts recorded.");
        return Ok(());
    }

    for line in format_conflict_lines(&conflicts) {
        println!("{line}");
    }
    Ok(())
}

fn format_conflict_lines(conflicts: &[MergeConflict]) -> Vec<String> {
    conflicts
        .iter()
        .map(|conflict| {
            format!(
                "{}  {:<4}  highlight={}  overwritten={} incoming={}",
                format_conflict_timestamp(conflict.resolved_at),
                conflict.strategy,
                conflict.highlight_id,
                conflict.overwritten_updated_at,
                conflict.incoming_updated_at
            )
        })
        .collect()
}

fn format_conflict_timestamp(timestamp_ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(timestamp_ms).map_or_else(
        || timestamp_ms.to_string(),
        |date_time| date_time.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}
