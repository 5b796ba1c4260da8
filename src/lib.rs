// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Pagestream
//!
//! A resumable pagination engine for page-based, rate-limited REST APIs.
//!
//! ## Features
//!
//! - **Lazy pagination**: items stream one at a time; pages are fetched on demand
//! - **Resumable**: periodic checkpoints let a later run continue where this one stopped
//! - **Retry with backoff**: bounded, jittered exponential backoff honoring Retry-After hints
//! - **Self-throttling**: pauses until the rate-limit window resets when quota runs low
//! - **Deduplication**: repeated items filtered by a configurable key field
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pagestream::fetch::{HttpFetcher, HttpFetcherConfig};
//! use pagestream::{Paginator, PaginatorConfig, Result};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // HTTP transport with default headers
//!     let fetcher = Arc::new(HttpFetcher::with_config(
//!         HttpFetcherConfig::builder()
//!             .base_url("https://api.github.com")
//!             .header("Authorization", "Bearer ghp_...")
//!             .build(),
//!     ));
//!
//!     // Resumable walk over every page of the endpoint
//!     let config = PaginatorConfig::new()
//!         .with_per_page(50)
//!         .with_checkpoint_path("repos.checkpoint.json");
//!     let mut paginator = Paginator::new("/user/repos", config, fetcher);
//!
//!     while let Some(item) = paginator.next_item().await? {
//!         println!("{item}");
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                        Paginator                          │
//! │  next_item() / stream() → lazy item sequence              │
//! │  collect_all()  process_batches()  save/load checkpoint   │
//! └───────────────────────────┬───────────────────────────────┘
//!                             │
//! ┌──────────┬──────────┬─────┴─────┬──────────────┬──────────┐
//! │  Retry   │  Links   │   Dedup   │  Checkpoint  │  Fetch   │
//! ├──────────┼──────────┼───────────┼──────────────┼──────────┤
//! │ Backoff  │ rel=next │ Key set   │ JSON file    │ reqwest  │
//! │ Jitter   │ rel=prev │ Type tags │ Atomic write │ Headers  │
//! │ Hints    │ Lenient  │ Opt-out   │ Match guard  │ Pacing   │
//! └──────────┴──────────┴───────────┴──────────────┴──────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)] // TODO: Add docs before 1.0 release

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the crate
pub mod error;

/// Common types and type aliases
pub mod types;

/// Link relation header parsing
pub mod links;

/// Duplicate item filtering
pub mod dedup;

/// Retry policy with jittered exponential backoff
pub mod retry;

/// Checkpoint persistence for resumable runs
pub mod checkpoint;

/// Page fetch boundary and HTTP transport
pub mod fetch;

/// The pagination engine
pub mod paginator;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use fetch::{PageFetcher, PageResult};
pub use paginator::{PageInfo, Paginator, PaginatorConfig};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
