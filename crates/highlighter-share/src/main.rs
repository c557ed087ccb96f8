//! Highlighter share surface
//!
//! Runs as its own process with its own connection to the shared store,
//! exactly like the main app: the store file is the only thing the two
//! processes share. Content providers arrive as ordered `--text`/`--url`
//! payloads (piped stdin counts as a plain-text provider).

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use highlighter_core::capture::{capture_highlight, CaptureOutcome, ContentProvider};
use highlighter_core::db::{Database, SqliteHighlightRepository};
use highlighter_core::paths::resolve_store_location;
use thiserror::Error;

#[derive(Parser)]
#[command(name = "highlighter-share")]
#[command(about = "Save shared text or links into the Highlighter store")]
#[command(version)]
struct Cli {
    /// Which capture surface to emulate
    #[arg(long, value_enum, default_value_t = Surface::Dialog)]
    surface: Surface,

    /// Plain-text content provider (repeatable, in share-pipeline order)
    #[arg(long = "text", value_name = "TEXT")]
    texts: Vec<String>,

    /// URL content provider (repeatable, in share-pipeline order)
    #[arg(long = "url", value_name = "URL")]
    urls: Vec<String>,

    /// Comma-separated tags for the captured highlight
    #[arg(long, value_name = "TAGS")]
    tags: Option<String>,

    /// Optional path to the shared store file
    #[arg(long, value_name = "PATH")]
    db_path: Option<PathBuf>,
}

/// The two capture-surface variants. Extraction and tag handling are
/// identical; they differ only in how an empty share is reported.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
enum Surface {
    /// Full dialog: reports a status line when nothing usable was shared
    Dialog,
    /// Compose sheet: completes silently when nothing usable was shared
    Compose,
}

#[derive(Debug, Error)]
enum ShareError {
    #[error(transparent)]
    Core(#[from] highlighter_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

fn main() {
    if let Err(error) = run() {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), ShareError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("highlighter=info".parse().expect("valid directive")),
        )
        .init();

    let cli = Cli::parse();
    let providers = build_providers(&cli.texts, &cli.urls, read_piped_stdin()?);
    tracing::debug!(
        "Share invoked as {:?} with {} provider(s)",
        cli.surface,
        providers.len()
    );

    let location = resolve_store_location(cli.db_path.as_deref());
    let db = Database::open_at_location(&location)?;
    let repo = SqliteHighlightRepository::new(db.connection());

    let tags = cli.tags.as_deref().unwrap_or_default();
    match capture_highlight(&repo, &providers, tags)? {
        CaptureOutcome::Saved(highlight) => match cli.surface {
            Surface::Dialog => println!("{}", highlight.id),
            Surface::Compose => {}
        },
        // Non-fatal either way: the dialog shows a status, the compose
        // sheet just completes.
        CaptureOutcome::NoContent => match cli.surface {
            Surface::Dialog => println!("No text found."),
            Surface::Compose => {}
        },
    }

    Ok(())
}

fn build_providers(
    texts: &[String],
    urls: &[String],
    piped: Option<String>,
) -> Vec<ContentProvider> {
    let mut providers: Vec<ContentProvider> = texts
        .iter()
        .map(|text| ContentProvider::plain_text(text.as_str()))
        .chain(piped.map(ContentProvider::plain_text))
        .collect();
    providers.extend(urls.iter().map(|url| ContentProvider::url(url.as_str())));
    providers
}

fn read_piped_stdin() -> Result<Option<String>, ShareError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    if buffer.trim().is_empty() {
        Ok(None)
    } else {
        Ok(Some(buffer))
    }
}
