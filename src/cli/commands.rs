//! CLI commands and argument parsing

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Resumable paginated-API client
#[derive(Parser, Debug)]
#[command(name = "pagestream")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Stream every item of a paginated endpoint to stdout
    Fetch(FetchArgs),

    /// Show the progress recorded in a checkpoint file
    Inspect {
        /// Checkpoint file path
        checkpoint: PathBuf,
    },
}

/// Arguments for the `fetch` command
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Endpoint path or absolute URL
    pub endpoint: String,

    /// Base URL prepended to relative endpoints
    #[arg(short, long)]
    pub base_url: Option<String>,

    /// Page to start from
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Items per page
    #[arg(long, default_value = "30")]
    pub per_page: u32,

    /// Only items updated at or after this instant
    #[arg(long)]
    pub since: Option<String>,

    /// Only items updated before this instant
    #[arg(long)]
    pub until: Option<String>,

    /// Sort field
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort direction (asc or desc)
    #[arg(long)]
    pub direction: Option<String>,

    /// Checkpoint file for resumable runs
    #[arg(short, long)]
    pub checkpoint: Option<PathBuf>,

    /// Persist a checkpoint every N items (0 = only on completion)
    #[arg(long, default_value = "100")]
    pub save_interval: u64,

    /// Start fresh even when a matching checkpoint exists
    #[arg(long)]
    pub no_resume: bool,

    /// Emit duplicate items instead of filtering them
    #[arg(long)]
    pub no_dedup: bool,

    /// Item field used for duplicate detection
    #[arg(long, default_value = "id")]
    pub dedup_field: String,

    /// Retry attempts after the first failure
    #[arg(long, default_value = "3")]
    pub max_retries: u32,

    /// Response field holding the item array (defaults to the whole
    /// body, falling back to "items" or "data" for object bodies)
    #[arg(long)]
    pub items_field: Option<String>,

    /// Extra request header as KEY=VALUE (repeatable)
    #[arg(short = 'H', long = "header")]
    pub headers: Vec<String>,

    /// Client-side pacing in requests per second
    #[arg(long)]
    pub requests_per_second: Option<u32>,

    /// Stop after this many items
    #[arg(long)]
    pub max_items: Option<u64>,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One JSON item per line
    Json,
    /// Indented JSON
    Pretty,
}
