//! Pagination engine
//!
//! Lazy, resumable traversal of page-based collections.
//!
//! # Overview
//!
//! The paginator module provides:
//! - `Paginator` - Fetches successive pages and yields items one at a time
//! - `PaginatorConfig` - Page size, filters, checkpointing, dedup and retry settings
//! - `PageInfo` - Snapshot of the current position and link relations
//!
//! A `Paginator` drives one endpoint: each page fetch goes through the
//! retry policy, the response's Link header decides whether another page
//! follows, duplicate items are filtered out, and progress is persisted
//! to a checkpoint file so a later run can pick up where this one left
//! off. When the remote rate limit is nearly exhausted the paginator
//! pauses between pages until the reported reset time.
//!
//! A paginator is forward-only. Once consumption has begun it cannot be
//! rewound; construct a fresh instance to replay from a checkpoint.

mod types;

pub use types::{PageInfo, PaginatorConfig};

use crate::checkpoint::{Checkpoint, CheckpointStore};
use crate::dedup::Deduplicator;
use crate::error::{Error, Result};
use crate::fetch::{PageFetcher, PageRequest, RateLimitSnapshot};
use crate::links::PageLinks;
use crate::retry::RetryPolicy;
use crate::types::JsonValue;
use chrono::Utc;
use futures::stream::{self, Stream};
use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Remaining-quota threshold below which the paginator pauses until the
/// server-reported reset time before fetching again.
pub const RATE_LIMIT_LOW_WATER: u32 = 10;

/// Lazy paginator over a page-based collection
///
/// Items are produced one at a time through [`next_item`](Self::next_item)
/// or the [`stream`](Self::stream) adapter. Fetching is demand-driven: a
/// page is requested only when the previous page's items are exhausted,
/// so a consumer that stops early never triggers speculative fetches.
///
/// One instance issues at most one page request at a time. A checkpoint
/// file belongs to a single paginator; two instances sharing a path will
/// overwrite each other's resume state.
pub struct Paginator {
    /// Endpoint path or URL this paginator traverses
    endpoint: String,
    /// Run configuration
    config: PaginatorConfig,
    /// Injected page fetcher
    fetcher: Arc<dyn PageFetcher>,
    /// Retry policy wrapping each page fetch
    retry: RetryPolicy,
    /// Duplicate-item filter, scoped to this instance
    dedup: Deduplicator,
    /// Checkpoint persistence, when a path is configured
    store: Option<CheckpointStore>,
    /// Next page number to fetch
    page: u32,
    /// Items yielded so far (including any restored from a checkpoint)
    total_processed: u64,
    /// Pages fetched by this instance
    pages_fetched: u32,
    /// Items from the current page not yet yielded
    buffer: VecDeque<JsonValue>,
    /// Link relations from the most recent response
    links: PageLinks,
    /// Rate-limit snapshot from the most recent response
    last_rate_limit: Option<RateLimitSnapshot>,
    /// Whether a rate-limit pause is owed before the next fetch
    throttle_pending: bool,
    /// Whether consumption has begun (resume happens once, here)
    started: bool,
    /// Whether the sequence has ended
    finished: bool,
}

impl Paginator {
    /// Create a paginator for an endpoint
    pub fn new(
        endpoint: impl Into<String>,
        config: PaginatorConfig,
        fetcher: Arc<dyn PageFetcher>,
    ) -> Self {
        let retry = RetryPolicy::new(config.retry.clone());
        let dedup = Deduplicator::new(config.dedup.clone());
        let store = config.checkpoint_path.as_ref().map(CheckpointStore::new);
        let page = config.page;
        Self {
            endpoint: endpoint.into(),
            fetcher,
            retry,
            dedup,
            store,
            page,
            total_processed: 0,
            pages_fetched: 0,
            buffer: VecDeque::new(),
            links: PageLinks::default(),
            last_rate_limit: None,
            throttle_pending: false,
            started: false,
            finished: false,
            config,
        }
    }

    /// Get the endpoint this paginator traverses
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Get the run configuration
    pub fn config(&self) -> &PaginatorConfig {
        &self.config
    }

    /// Total items yielded so far, including any count restored from a
    /// checkpoint on resume
    pub fn total_processed(&self) -> u64 {
        self.total_processed
    }

    /// Pages fetched by this instance
    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    /// Rate-limit snapshot from the most recent response
    pub fn last_rate_limit(&self) -> Option<RateLimitSnapshot> {
        self.last_rate_limit
    }

    /// True once the sequence has ended
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Snapshot of the current pagination position
    pub fn page_info(&self) -> PageInfo {
        PageInfo {
            page: self.page,
            per_page: self.config.per_page,
            has_next: self.links.has_next(),
            has_prev: self.links.has_prev(),
            next_url: self.links.next.clone(),
            prev_url: self.links.prev.clone(),
            first_url: self.links.first.clone(),
            last_url: self.links.last.clone(),
        }
    }

    /// Build a checkpoint describing the current position
    pub fn current_checkpoint(&self) -> Checkpoint {
        Checkpoint::new(
            &self.endpoint,
            self.page,
            self.config.per_page,
            self.total_processed,
            self.config.options.clone(),
        )
    }

    /// Persist the current position immediately, outside the automatic
    /// save interval
    ///
    /// Unlike the interval saves, which are best-effort, an explicit save
    /// reports write failures to the caller.
    pub async fn save_checkpoint(&self) -> Result<()> {
        let Some(store) = &self.store else {
            return Err(Error::config("no checkpoint path configured"));
        };
        store.save(&self.current_checkpoint()).await
    }

    /// Load the checkpoint for this endpoint and page size, if one exists
    ///
    /// This is a read-only peek. It does not move the paginator; resuming
    /// happens once, on first consumption, when `resume` is enabled.
    pub async fn load_checkpoint(&self) -> Option<Checkpoint> {
        match &self.store {
            Some(store) => store.load(&self.endpoint, self.config.per_page).await,
            None => None,
        }
    }

    /// Produce the next item, fetching further pages as needed
    ///
    /// Returns `Ok(None)` once the collection is exhausted. A fetch
    /// failure (after retries) ends the sequence; later calls return
    /// `Ok(None)` without fetching again.
    pub async fn next_item(&mut self) -> Result<Option<JsonValue>> {
        if self.finished {
            return Ok(None);
        }
        if !self.started {
            self.resume_if_configured().await;
        }

        loop {
            if let Some(item) = self.buffer.pop_front() {
                self.total_processed += 1;
                self.save_on_interval().await;
                return Ok(Some(item));
            }

            // Between pages. The pause owed for the previous response
            // happens before deciding whether another page follows, so a
            // depleted quota is respected even on the final page.
            if self.throttle_pending {
                self.throttle_wait().await;
            }
            if self.pages_fetched > 0 && !self.links.has_next() {
                return self.finish().await;
            }
            if let Err(err) = self.fetch_page().await {
                self.finished = true;
                return Err(err);
            }
        }
    }

    /// Adapt the paginator into a `Stream` of items
    ///
    /// The stream borrows the paginator, so accessors like
    /// [`page_info`](Self::page_info) remain usable after the stream is
    /// dropped.
    pub fn stream(&mut self) -> impl Stream<Item = Result<JsonValue>> + '_ {
        stream::try_unfold(self, |paginator| async move {
            match paginator.next_item().await? {
                Some(item) => Ok(Some((item, paginator))),
                None => Ok(None),
            }
        })
    }

    /// Drain the entire sequence into a vector
    pub async fn collect_all(&mut self) -> Result<Vec<JsonValue>> {
        let mut items = Vec::new();
        while let Some(item) = self.next_item().await? {
            items.push(item);
        }
        Ok(items)
    }

    /// Consume the sequence in fixed-size batches
    ///
    /// The handler is invoked once per full batch; a partial batch left
    /// at stream end is flushed as the final call. Returns the number of
    /// handler invocations.
    pub async fn process_batches<F, Fut>(&mut self, batch_size: usize, mut handler: F) -> Result<u64>
    where
        F: FnMut(Vec<JsonValue>) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        if batch_size == 0 {
            return Err(Error::config("batch size must be greater than zero"));
        }

        let mut batch = Vec::with_capacity(batch_size);
        let mut batches = 0u64;
        while let Some(item) = self.next_item().await? {
            batch.push(item);
            if batch.len() == batch_size {
                handler(std::mem::take(&mut batch)).await?;
                batches += 1;
            }
        }
        if !batch.is_empty() {
            handler(batch).await?;
            batches += 1;
        }
        Ok(batches)
    }

    /// Restore page and progress counters from a matching checkpoint
    async fn resume_if_configured(&mut self) {
        self.started = true;
        if !self.config.resume {
            return;
        }
        let Some(store) = &self.store else {
            return;
        };
        if let Some(checkpoint) = store.load(&self.endpoint, self.config.per_page).await {
            debug!(
                "Resuming {} from checkpoint: page {}, {} items processed",
                self.endpoint, checkpoint.page, checkpoint.total_processed
            );
            self.page = checkpoint.page;
            self.total_processed = checkpoint.total_processed;
        }
    }

    /// Fetch the next page through the retry policy and refill the buffer
    async fn fetch_page(&mut self) -> Result<()> {
        let request = PageRequest::new(
            &self.endpoint,
            self.page,
            self.config.per_page,
            self.config.options.clone(),
        );
        let url = request.to_url();
        let context = format!("GET {} page {}", self.endpoint, self.page);
        let fetcher = Arc::clone(&self.fetcher);

        let result = self
            .retry
            .execute_with_retry(
                || {
                    let fetcher = Arc::clone(&fetcher);
                    let url = url.clone();
                    async move { fetcher.fetch(&url).await }
                },
                &context,
            )
            .await?;

        let requested_page = self.page;
        self.pages_fetched += 1;
        self.links = PageLinks::from_header(result.link_header.as_deref());
        if self.links.has_next() {
            // Advance immediately so any checkpoint written while this
            // page's items are consumed names the page a resume should
            // fetch next.
            self.page += 1;
        }
        self.last_rate_limit = result.rate_limit;
        self.throttle_pending = self
            .last_rate_limit
            .is_some_and(|snapshot| snapshot.remaining < RATE_LIMIT_LOW_WATER);

        let fetched = result.items.len();
        let kept = self.dedup.filter(result.items);
        debug!(
            "Fetched {} page {}: {} of {} items kept",
            self.endpoint,
            requested_page,
            kept.len(),
            fetched
        );
        self.buffer.extend(kept);
        Ok(())
    }

    /// Save a checkpoint when the processed count lands on the interval
    ///
    /// Interval saves are best-effort: a write failure is logged and the
    /// stream continues.
    async fn save_on_interval(&self) {
        if self.config.save_interval == 0 {
            return;
        }
        if self.total_processed == 0 || self.total_processed % self.config.save_interval != 0 {
            return;
        }
        let Some(store) = &self.store else {
            return;
        };
        if let Err(err) = store.save(&self.current_checkpoint()).await {
            warn!("Failed to save checkpoint for {}: {}", self.endpoint, err);
        }
    }

    /// Pause until the reported rate-limit reset
    async fn throttle_wait(&mut self) {
        self.throttle_pending = false;
        let Some(snapshot) = self.last_rate_limit else {
            return;
        };
        let now = Utc::now().timestamp().max(0) as u64;
        let wait = snapshot.seconds_until_reset(now);
        if wait == 0 {
            return;
        }
        warn!(
            "Rate limit low ({}/{} remaining), pausing {}s until reset",
            snapshot.remaining, snapshot.limit, wait
        );
        tokio::time::sleep(Duration::from_secs(wait)).await;
    }

    /// Mark the sequence complete and write the final checkpoint
    async fn finish(&mut self) -> Result<Option<JsonValue>> {
        self.finished = true;
        if let Some(store) = &self.store {
            if let Err(err) = store.save(&self.current_checkpoint()).await {
                warn!(
                    "Failed to save final checkpoint for {}: {}",
                    self.endpoint, err
                );
            }
        }
        debug!(
            "Pagination of {} complete: {} items in {} pages",
            self.endpoint, self.total_processed, self.pages_fetched
        );
        Ok(None)
    }
}
