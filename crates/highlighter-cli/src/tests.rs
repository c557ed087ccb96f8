use highlighter_core::db::{Database, HighlightRepository, SqliteHighlightRepository};
use highlighter_core::paths::StoreLocation;
use highlighter_core::{Highlight, HighlightDraft};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

use crate::commands::common::{
    default_editor, format_relative_time, highlight_preview, normalize_highlight_identifier,
    normalize_tags, normalize_text, resolve_highlight,
};
use crate::commands::delete::run_delete;
use crate::commands::refresh::run_refresh;
use crate::error::CliError;

#[test]
fn normalize_text_trims_and_rejects_empty() {
    assert_eq!(normalize_text("  hello  "), Some("hello".to_string()));
    assert_eq!(normalize_text(" \n\t "), None);
}

#[test]
fn normalize_text_keeps_multiline_input() {
    assert_eq!(
        normalize_text("line 1\nline 2\n"),
        Some("line 1\nline 2".to_string())
    );
}

#[test]
fn normalize_tags_trims_and_defaults_to_empty() {
    assert_eq!(normalize_tags(Some("  work,reading  ")), "work,reading");
    assert_eq!(normalize_tags(None), "");
}

#[test]
fn normalize_highlight_identifier_rejects_empty() {
    assert!(matches!(
        normalize_highlight_identifier(" \n "),
        Err(CliError::EmptyHighlightId)
    ));
    assert_eq!(
        normalize_highlight_identifier("  abc123  ").unwrap(),
        "abc123".to_string()
    );
}

#[test]
fn default_editor_is_defined() {
    assert!(!default_editor().is_empty());
}

#[test]
fn format_relative_time_units() {
    let now = 10_000_000;
    assert_eq!(format_relative_time(now - 30_000, now), "just now");
    assert_eq!(format_relative_time(now - 120_000, now), "2m ago");
    assert_eq!(format_relative_time(now - 2 * 60 * 60_000, now), "2h ago");
}

#[test]
fn highlight_preview_truncates_with_ellipsis() {
    let highlight = Highlight::new("This is a very long sentence that should be shortened", "");
    let preview = highlight_preview(&highlight, 20);
    assert_eq!(preview, "This is a very lo...");
}

fn save_highlight_with_id(repo: &SqliteHighlightRepository<'_>, id: &str, text: &str) {
    let mut highlight = Highlight::new(text, "");
    highlight.id = id.parse().unwrap();
    let mut draft = HighlightDraft::new(highlight);
    repo.save(&mut draft).unwrap();
}

#[test]
fn resolve_highlight_supports_exact_and_prefix_id() {
    let db = Database::open_in_memory().unwrap();
    let repo = SqliteHighlightRepository::new(db.connection());

    save_highlight_with_id(&repo, "11111111-1111-4111-8111-111111111111", "Left");
    save_highlight_with_id(&repo, "11111111-1111-4111-8111-222222222222", "Right");

    let by_exact = resolve_highlight("11111111-1111-4111-8111-111111111111", &repo).unwrap();
    assert_eq!(by_exact.text, "Left");

    let by_prefix = resolve_highlight("11111111-1111-4111-8111-2", &repo).unwrap();
    assert_eq!(by_prefix.text, "Right");
}

#[test]
fn resolve_highlight_rejects_ambiguous_prefix() {
    let db = Database::open_in_memory().unwrap();
    let repo = SqliteHighlightRepository::new(db.connection());

    save_highlight_with_id(&repo, "aaaaaaaa-aaaa-4aaa-8aaa-aaaaaaaaaaaa", "Left");
    save_highlight_with_id(&repo, "aaaaaaaa-aaaa-4aaa-8aaa-bbbbbbbbbbbb", "Right");

    let error = resolve_highlight("aaaaaaaa-aaaa-4aaa-8aaa", &repo).unwrap_err();
    assert!(matches!(error, CliError::AmbiguousHighlightId(_)));
}

#[test]
fn resolve_highlight_rejects_missing_highlight() {
    let db = Database::open_in_memory().unwrap();
    let repo = SqliteHighlightRepository::new(db.connection());

    let error = resolve_highlight("does-not-exist", &repo).unwrap_err();
    assert!(matches!(error, CliError::HighlightNotFound(_)));
}

#[test]
fn run_delete_removes_highlight_by_prefix() {
    let tmp = tempdir().unwrap();
    let db_path = tmp.path().join("highlighter.db");
    let location = StoreLocation::OnDisk(db_path.clone());

    let keep_id = "bbbbbbbb-bbbb-4bbb-8bbb-111111111111";
    let delete_id = "bbbbbbbb-bbbb-4bbb-8bbb-222222222222";
    {
        let db = Database::open(&db_path).unwrap();
        let repo = SqliteHighlightRepository::new(db.connection());
        save_highlight_with_id(&repo, keep_id, "Keep me");
        save_highlight_with_id(&repo, delete_id, "Delete me");
    }

    run_delete("bbbbbbbb-bbbb-4bbb-8bbb-2", &location).unwrap();

    let db = Database::open(&db_path).unwrap();
    let repo = SqliteHighlightRepository::new(db.connection());
    assert!(repo.get(&delete_id.parse().unwrap()).unwrap().is_none());
    assert!(repo.get(&keep_id.parse().unwrap()).unwrap().is_some());
}

#[test]
fn run_refresh_applies_foreign_writes() {
    let tmp = tempdir().unwrap();
    let db_path = tmp.path().join("highlighter.db");
    let location = StoreLocation::OnDisk(db_path.clone());

    // First refresh registers the main-app history cursor.
    run_refresh(false, &location).unwrap();

    // A second connection (the share surface) writes independently.
    {
        let writer = Database::open(&db_path).unwrap();
        let repo = SqliteHighlightRepository::new(writer.connection());
        let mut draft = repo.insert("written by share", "links");
        repo.save(&mut draft).unwrap();
    }

    run_refresh(false, &location).unwrap();

    let db = Database::open(&db_path).unwrap();
    let repo = SqliteHighlightRepository::new(db.connection());
    let listed = repo.list().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].text, "written by share");
}

#[cfg(unix)]
#[test]
fn run_edit_cancel_leaves_record_untouched() {
    use crate::commands::edit::run_edit;
    use std::os::unix::fs::PermissionsExt;

    let tmp = tempdir().unwrap();
    let db_path = tmp.path().join("highlighter.db");
    let location = StoreLocation::OnDisk(db_path.clone());

    let id = "cccccccc-cccc-4ccc-8ccc-111111111111";
    {
        let db = Database::open(&db_path).unwrap();
        let repo = SqliteHighlightRepository::new(db.connection());
        let mut highlight = Highlight::new("original text", "keep,tags");
        highlight.id = id.parse().unwrap();
        let mut draft = HighlightDraft::new(highlight);
        repo.save(&mut draft).unwrap();
    }

    // An editor that empties the buffer stands in for the user canceling.
    let editor = tmp.path().join("cancel-editor.sh");
    std::fs::write(&editor, "#!/bin/sh\nprintf '' > \"$1\"\n").unwrap();
    std::fs::set_permissions(&editor, std::fs::Permissions::from_mode(0o755)).unwrap();
    std::env::set_var("VISUAL", &editor);

    let error = run_edit(id, None, &location).unwrap_err();
    std::env::remove_var("VISUAL");
    assert!(matches!(error, CliError::EmptyEditedText));

    // The stored record is exactly as it was before the edit.
    let db = Database::open(&db_path).unwrap();
    let repo = SqliteHighlightRepository::new(db.connection());
    let stored = repo.get(&id.parse().unwrap()).unwrap().unwrap();
    assert_eq!(stored.text, "original text");
    assert_eq!(stored.tags, "keep,tags");
    assert!(stored.updated_at.is_none());
}
