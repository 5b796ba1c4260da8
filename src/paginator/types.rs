//! Paginator types
//!
//! Configuration and pagination info snapshot for the paginator.

use crate::dedup::DedupConfig;
use crate::retry::RetryConfig;
use crate::types::QueryOptions;
use serde::Serialize;
use std::path::PathBuf;

/// Configuration for a pagination run
#[derive(Debug, Clone)]
pub struct PaginatorConfig {
    /// Page number to start fetching from
    pub page: u32,
    /// Items requested per page
    pub per_page: u32,
    /// Filter and sort options forwarded as query parameters
    pub options: QueryOptions,
    /// Checkpoint file path (no checkpointing when unset)
    pub checkpoint_path: Option<PathBuf>,
    /// Persist a checkpoint every this many processed items (0 = never)
    pub save_interval: u64,
    /// Whether to resume from a matching checkpoint on first consumption
    pub resume: bool,
    /// Deduplication settings
    pub dedup: DedupConfig,
    /// Retry policy settings for page fetches
    pub retry: RetryConfig,
}

impl Default for PaginatorConfig {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 30,
            options: QueryOptions::default(),
            checkpoint_path: None,
            save_interval: 100,
            resume: true,
            dedup: DedupConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}

impl PaginatorConfig {
    /// Create a new paginator config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the starting page
    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Set the page size
    #[must_use]
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    /// Set filter and sort options
    #[must_use]
    pub fn with_options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the checkpoint file path
    #[must_use]
    pub fn with_checkpoint_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.checkpoint_path = Some(path.into());
        self
    }

    /// Set the checkpoint save interval in items
    #[must_use]
    pub fn with_save_interval(mut self, interval: u64) -> Self {
        self.save_interval = interval;
        self
    }

    /// Enable or disable resuming from a checkpoint
    #[must_use]
    pub fn with_resume(mut self, resume: bool) -> Self {
        self.resume = resume;
        self
    }

    /// Set deduplication settings
    #[must_use]
    pub fn with_dedup(mut self, dedup: DedupConfig) -> Self {
        self.dedup = dedup;
        self
    }

    /// Set retry policy settings
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

/// Snapshot of the paginator's position within the collection
///
/// `page` is the page number the next fetch will request. It advances as
/// soon as a response carries a "next" relation, so a snapshot taken while
/// items from the current page are still being consumed already points at
/// the upcoming page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    /// Page number the next fetch will request
    pub page: u32,
    /// Items requested per page
    pub per_page: u32,
    /// Whether the last response advertised a "next" relation
    pub has_next: bool,
    /// Whether the last response advertised a "prev" relation
    pub has_prev: bool,
    /// URL of the "next" relation, if advertised
    pub next_url: Option<String>,
    /// URL of the "prev" relation, if advertised
    pub prev_url: Option<String>,
    /// URL of the "first" relation, if advertised
    pub first_url: Option<String>,
    /// URL of the "last" relation, if advertised
    pub last_url: Option<String>,
}
