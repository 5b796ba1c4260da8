//! CLI module
//!
//! Command-line interface for streaming paginated endpoints.
//!
//! # Commands
//!
//! - `fetch` - Stream every item of an endpoint to stdout
//! - `inspect` - Show the progress recorded in a checkpoint file

mod commands;
mod runner;

pub use commands::{Cli, Commands, FetchArgs, OutputFormat};
pub use runner::Runner;
