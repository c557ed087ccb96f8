//! Highlighter CLI - the main app surface
//!
//! Lists, edits, and deletes highlights in the shared store, and applies
//! pending changes written by the share surface process.

mod cli;
mod commands;
mod error;
#[cfg(test)]
mod tests;

use clap::Parser;
use highlighter_core::paths::resolve_store_location;

use crate::cli::{Cli, Commands};
use crate::error::CliError;

fn main() {
    if let Err(error) = run() {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("highlighter=info".parse().expect("valid directive")),
        )
        .init();

    let cli = Cli::parse();
    let location = resolve_store_location(cli.db_path.as_deref());

    match cli.command {
        Commands::Add { text, tags } => {
            commands::add::run_add(&text, tags.as_deref(), &location)?;
        }
        Commands::List { limit, json } => commands::list::run_list(limit, json, &location)?,
        Commands::Edit { id, tags } => {
            commands::edit::run_edit(&id, tags.as_deref(), &location)?;
        }
        Commands::Delete { id } => commands::delete::run_delete(&id, &location)?,
        Commands::Refresh { json } => commands::refresh::run_refresh(json, &location)?,
        Commands::Conflicts { limit, json } => {
            commands::conflicts::run_conflicts(limit, json, &location)?;
        }
    }

    Ok(())
}
