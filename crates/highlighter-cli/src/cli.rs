use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "highlighter")]
#[command(about = "Capture and organize text highlights from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to the shared store file
    #[arg(long, value_name = "PATH")]
    pub db_path: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new highlight
    #[command(alias = "new")]
    Add {
        /// Highlight text
        text: Vec<String>,
        /// Comma-separated tags
        #[arg(long, value_name = "TAGS")]
        tags: Option<String>,
    },
    /// List highlights, newest first
    List {
        /// Maximum number of highlights to show (all when omitted)
        #[arg(short, long)]
        limit: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit an existing highlight
    Edit {
        /// Highlight ID or unique ID prefix
        id: String,
        /// Replace the comma-separated tags (kept unchanged when omitted)
        #[arg(long, value_name = "TAGS")]
        tags: Option<String>,
    },
    /// Delete an existing highlight
    Delete {
        /// Highlight ID or unique ID prefix
        id: String,
    },
    /// Apply pending cross-process changes, then list
    Refresh {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List recorded merge conflicts
    Conflicts {
        /// Number of conflicts to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
