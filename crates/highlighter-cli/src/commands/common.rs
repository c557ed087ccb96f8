use std::env;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::Utc;
use highlighter_core::db::{Database, HighlightRepository, SqliteHighlightRepository};
use highlighter_core::paths::StoreLocation;
use highlighter_core::{Highlight, HighlightId};
use serde::Serialize;

use crate::error::CliError;

/// History client name for the main-app process
pub const CLIENT_MAIN_APP: &str = "main-app";

#[derive(Debug, Serialize)]
pub struct HighlightListItem {
    pub id: String,
    pub preview: String,
    pub text: String,
    pub tags: String,
    pub created_at: i64,
    pub updated_at: Option<i64>,
    pub relative_time: String,
}

pub fn open_store(location: &StoreLocation) -> Result<Database, CliError> {
    Ok(Database::open_at_location(location)?)
}

pub fn resolve_highlight(
    query: &str,
    repo: &SqliteHighlightRepository<'_>,
) -> Result<Highlight, CliError> {
    if let Ok(id) = query.parse::<HighlightId>() {
        if let Some(highlight) = repo.get(&id)? {
            return Ok(highlight);
        }
    }

    let matching_ids = repo.list_ids_by_prefix(query, 3)?;

    match matching_ids.len() {
        0 => Err(CliError::HighlightNotFound(query.to_string())),
        1 => {
            let resolved_id = matching_ids[0]
                .parse::<HighlightId>()
                .map_err(|_| CliError::HighlightNotFound(query.to_string()))?;
            repo.get(&resolved_id)?
                .ok_or_else(|| CliError::HighlightNotFound(query.to_string()))
        }
        _ => {
            let options = matching_ids
                .iter()
                .take(3)
                .map(|id| id.chars().take(13).collect::<String>())
                .collect::<Vec<_>>()
                .join(", ");

            Err(CliError::AmbiguousHighlightId(format!(
                "ID prefix '{query}' is ambiguous; matches: {options}"
            )))
        }
    }
}

pub fn format_highlight_lines(highlights: &[Highlight]) -> Vec<String> {
    let now_ms = Utc::now().timestamp_millis();
    highlights
        .iter()
        .map(|highlight| {
            let id = highlight.id.to_string();
            let short_id = id.chars().take(13).collect::<String>();
            let preview = highlight_preview(highlight, 40);
            let relative_time = format_relative_time(highlight.created_at, now_ms);

            if highlight.tags.is_empty() {
                format!("{short_id:<13}  {preview:<40}  {relative_time}")
            } else {
                format!(
                    "{short_id:<13}  {preview:<40}  {relative_time:<10}  {}",
                    highlight.tags
                )
            }
        })
        .collect()
}

pub fn highlight_to_list_item(highlight: &Highlight) -> HighlightListItem {
    let now_ms = Utc::now().timestamp_millis();

    HighlightListItem {
        id: highlight.id.to_string(),
        preview: highlight_preview(highlight, 80),
        text: highlight.text.clone(),
        tags: highlight.tags.clone(),
        created_at: highlight.created_at,
        updated_at: highlight.updated_at,
        relative_time: format_relative_time(highlight.created_at, now_ms),
    }
}

pub fn highlight_preview(highlight: &Highlight, max_chars: usize) -> String {
    let first_line = highlight.text.lines().next().unwrap_or("").trim();
    let collapsed = first_line.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}

/// Resolve highlight text from args, piped stdin, or an editor session.
///
/// `Ok(None)` means the user canceled (empty editor result); the caller
/// decides what to do with its uncommitted draft.
pub fn resolve_highlight_text(text_parts: &[String]) -> Result<Option<String>, CliError> {
    if let Some(text) = normalize_text(&text_parts.join(" ")) {
        return Ok(Some(text));
    }

    if let Some(text) = read_piped_stdin()? {
        return Ok(Some(text));
    }

    capture_editor_input()
}

pub fn normalize_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn normalize_tags(tags: Option<&str>) -> String {
    tags.map(str::trim).unwrap_or_default().to_string()
}

pub fn normalize_highlight_identifier(id: &str) -> Result<String, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyHighlightId)
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn read_piped_stdin() -> Result<Option<String>, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(normalize_text(&buffer))
}

pub fn capture_editor_input() -> Result<Option<String>, CliError> {
    capture_editor_input_with_initial("")
}

pub fn capture_editor_input_with_initial(
    initial_text: &str,
) -> Result<Option<String>, CliError> {
    let editor = preferred_editor();
    let temp_file = create_temp_highlight_file_path();
    std::fs::write(&temp_file, initial_text)?;

    let launch_result = launch_editor(&editor, &temp_file);
    let text = std::fs::read_to_string(&temp_file)?;
    let _ = std::fs::remove_file(&temp_file);

    launch_result?;
    Ok(normalize_text(&text))
}

pub fn launch_editor(editor: &str, file_path: &Path) -> Result<(), CliError> {
    match Command::new(editor).arg(file_path).status() {
        Ok(status) => {
            if status.success() {
                Ok(())
            } else {
                Err(CliError::EditorFailed(format!(
                    "`{editor}` exited with status {status}"
                )))
            }
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            // Fallback for editor commands with args, e.g. "code --wait"
            let mut parts = editor.split_whitespace();
            let Some(program) = parts.next() else {
                return Err(CliError::EditorFailed("empty EDITOR command".into()));
            };

            let mut command = Command::new(program);
            command.args(parts).arg(file_path);

            let status = command.status()?;
            if status.success() {
                Ok(())
            } else {
                Err(CliError::EditorFailed(format!(
                    "`{editor}` exited with status {status}"
                )))
            }
        }
        Err(err) => Err(CliError::Io(err)),
    }
}

pub fn preferred_editor() -> String {
    env::var("VISUAL")
        .or_else(|_| env::var("EDITOR"))
        .unwrap_or_else(|_| default_editor().to_string())
}

pub const fn default_editor() -> &'static str {
    if cfg!(windows) {
        "notepad"
    } else {
        "vi"
    }
}

pub fn create_temp_highlight_file_path() -> PathBuf {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_nanos());
    env::temp_dir().join(format!("highlight-{}-{now}.txt", std::process::id()))
}
