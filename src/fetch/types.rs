//! Transport boundary types

use crate::error::Result;
use crate::types::{JsonValue, QueryOptions};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// An immutable description of one page fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Endpoint path or URL the page belongs to
    pub endpoint: String,
    /// Page number to fetch (1-based for most APIs)
    pub page: u32,
    /// Requested page size
    pub per_page: u32,
    /// Filter/sort parameters echoed into the query string
    pub options: QueryOptions,
}

impl PageRequest {
    /// Create a page request
    pub fn new(endpoint: impl Into<String>, page: u32, per_page: u32, options: QueryOptions) -> Self {
        Self {
            endpoint: endpoint.into(),
            page,
            per_page,
            options,
        }
    }

    /// Render the request as a URL with an encoded query string.
    /// Endpoints that already carry a query string are extended.
    pub fn to_url(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        serializer.append_pair("page", &self.page.to_string());
        serializer.append_pair("per_page", &self.per_page.to_string());
        for (key, value) in self.options.to_query_pairs() {
            serializer.append_pair(key, &value);
        }
        let query = serializer.finish();

        let separator = if self.endpoint.contains('?') { '&' } else { '?' };
        format!("{}{}{}", self.endpoint, separator, query)
    }
}

/// Remote rate-limit accounting, as reported by one response.
///
/// Recomputed on every fetch; never persisted. Drives the paginator's
/// between-page self-throttle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitSnapshot {
    /// Total request quota in the current window
    pub limit: u32,
    /// Requests left in the current window
    pub remaining: u32,
    /// Requests already spent in the current window
    pub used: u32,
    /// Unix epoch seconds at which the window resets
    pub reset_epoch: u64,
}

impl RateLimitSnapshot {
    /// Seconds until the reported reset, measured from `now_epoch`.
    /// Zero when the reset is already in the past.
    pub fn seconds_until_reset(&self, now_epoch: u64) -> u64 {
        self.reset_epoch.saturating_sub(now_epoch)
    }
}

/// One fetched page: the raw items plus the response metadata the
/// paginator needs to decide what happens next.
#[derive(Debug, Clone, Default)]
pub struct PageResult {
    /// Raw items in server order
    pub items: Vec<JsonValue>,
    /// Raw Link header value, if the response carried one
    pub link_header: Option<String>,
    /// Rate-limit accounting, if the response carried it
    pub rate_limit: Option<RateLimitSnapshot>,
}

impl PageResult {
    /// A page holding just items
    pub fn new(items: Vec<JsonValue>) -> Self {
        Self {
            items,
            link_header: None,
            rate_limit: None,
        }
    }

    /// Attach a Link header value
    #[must_use]
    pub fn with_link_header(mut self, header: impl Into<String>) -> Self {
        self.link_header = Some(header.into());
        self
    }

    /// Attach rate-limit accounting
    #[must_use]
    pub fn with_rate_limit(mut self, snapshot: RateLimitSnapshot) -> Self {
        self.rate_limit = Some(snapshot);
        self
    }
}

/// The injected transport: fetch one page by URL.
///
/// The paginator performs no network I/O of its own; this trait is the
/// boundary to whatever HTTP stack the caller uses. Fetches run inside
/// the retry policy and may be invoked several times for the same URL,
/// so implementations must be idempotent or tolerant of repeats.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the page at `url`
    async fn fetch(&self, url: &str) -> Result<PageResult>;
}
