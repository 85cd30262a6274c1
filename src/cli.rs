//! Command-line interface.

use clap::Parser;

/// Ingest a raw document corpus into the vector index.
///
/// Walks the configured raw-data directory, extracts and chunks each
/// document, embeds the chunks, and upserts them in batches. All settings
/// come from environment variables (see `Config`).
#[derive(Debug, Parser)]
#[command(name = "vingest")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug-level logging
    #[arg(long, short = 'v')]
    pub verbose: bool,
}
