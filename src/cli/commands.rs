use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "newsscan")]
#[command(about = "Scan a news feed for mental-health and LGBT keywords and build a text corpus")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the feed, scan every article and record the matches
    Run {
        /// Dry run - scan and report matches without writing any files
        #[arg(long)]
        dry_run: bool,

        /// Only process the first N feed entries (overrides NEWSSCAN_MAX_ITEMS)
        #[arg(long, value_name = "N")]
        limit: Option<usize>,
    },

    /// Show the configured keyword lists and match mode
    Keywords,

    /// Extract and scan a saved HTML page
    Scan {
        /// Path to an HTML file
        path: PathBuf,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}
