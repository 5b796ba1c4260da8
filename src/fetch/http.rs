//! HTTP-backed page fetcher
//!
//! A reqwest implementation of `PageFetcher` that classifies response
//! statuses for the retry policy, captures pagination and rate-limit
//! headers, and optionally paces its own requests with a token bucket.

use super::types::{PageFetcher, PageResult, RateLimitSnapshot};
use crate::error::{Error, Result};
use crate::retry::parse_retry_after;
use crate::types::{JsonValue, StringMap};
use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use std::num::NonZeroU32;
use std::time::Duration;
use tracing::debug;

/// Configuration for the HTTP fetcher
#[derive(Debug, Clone)]
pub struct HttpFetcherConfig {
    /// Base URL prepended to relative request URLs
    pub base_url: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Default headers sent with every request
    pub default_headers: StringMap,
    /// User agent string
    pub user_agent: String,
    /// Object-body field holding the items; `items` then `data` are tried
    /// when unset
    pub items_field: Option<String>,
    /// Client-side pacing in requests per second; None or zero disables it
    pub requests_per_second: Option<u32>,
}

impl Default for HttpFetcherConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            default_headers: StringMap::new(),
            user_agent: format!("pagestream/{}", env!("CARGO_PKG_VERSION")),
            items_field: None,
            requests_per_second: None,
        }
    }
}

impl HttpFetcherConfig {
    /// Create a new config builder
    pub fn builder() -> HttpFetcherConfigBuilder {
        HttpFetcherConfigBuilder::default()
    }
}

/// Builder for HTTP fetcher config
#[derive(Default)]
pub struct HttpFetcherConfigBuilder {
    config: HttpFetcherConfig,
}

impl HttpFetcherConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Name the object-body field holding the items
    pub fn items_field(mut self, field: impl Into<String>) -> Self {
        self.config.items_field = Some(field.into());
        self
    }

    /// Pace requests client-side at the given rate
    pub fn requests_per_second(mut self, rps: u32) -> Self {
        self.config.requests_per_second = Some(rps);
        self
    }

    /// Build the config
    pub fn build(self) -> HttpFetcherConfig {
        self.config
    }
}

/// A `PageFetcher` backed by reqwest.
pub struct HttpFetcher {
    client: Client,
    config: HttpFetcherConfig,
    pacer: Option<DefaultDirectRateLimiter>,
}

impl HttpFetcher {
    /// Create a fetcher with default configuration
    pub fn new() -> Self {
        Self::with_config(HttpFetcherConfig::default())
    }

    /// Create a fetcher with custom configuration
    pub fn with_config(config: HttpFetcherConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .expect("Failed to build HTTP client");

        let pacer = config
            .requests_per_second
            .and_then(NonZeroU32::new)
            .map(|rps| RateLimiter::direct(Quota::per_second(rps)));

        Self {
            client,
            config,
            pacer,
        }
    }

    /// Build the full request URL from a possibly relative one
    fn build_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            return url.to_string();
        }
        match &self.config.base_url {
            Some(base) => {
                let base = base.trim_end_matches('/');
                let path = url.trim_start_matches('/');
                format!("{base}/{path}")
            }
            None => url.to_string(),
        }
    }

    /// Pull the item array out of a response body.
    ///
    /// Bare arrays are taken as-is. Object bodies use the configured items
    /// field when set, otherwise `items` then `data`.
    fn extract_items(&self, body: JsonValue) -> Result<Vec<JsonValue>> {
        match body {
            JsonValue::Array(items) => Ok(items),
            JsonValue::Object(mut map) => {
                if let Some(field) = &self.config.items_field {
                    return match map.remove(field.as_str()) {
                        Some(JsonValue::Array(items)) => Ok(items),
                        Some(_) => Err(Error::decode(format!(
                            "response field '{field}' is not an array"
                        ))),
                        None => Err(Error::decode(format!(
                            "response object has no '{field}' field"
                        ))),
                    };
                }
                for field in ["items", "data"] {
                    if let Some(JsonValue::Array(_)) = map.get(field) {
                        if let Some(JsonValue::Array(items)) = map.remove(field) {
                            return Ok(items);
                        }
                    }
                }
                Err(Error::decode(
                    "response object carries no 'items' or 'data' array",
                ))
            }
            other => Err(Error::decode(format!(
                "expected an array or object response, got: {other}"
            ))),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpFetcher")
            .field("config", &self.config)
            .field("has_pacer", &self.pacer.is_some())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<PageResult> {
        if let Some(pacer) = &self.pacer {
            pacer.until_ready().await;
        }

        let full_url = self.build_url(url);
        let mut request = self.client.get(&full_url);
        for (key, value) in &self.config.default_headers {
            request = request.header(key.as_str(), value.as_str());
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(parse_retry_after);
            return Err(Error::rate_limited(
                format!("HTTP 429 from {full_url}"),
                retry_after,
            ));
        }

        if !status.is_success() {
            let code = status.as_u16();
            // 503s can carry Retry-After just like 429s; pass the hint on.
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(parse_retry_after);
            let body = response.text().await.unwrap_or_default();
            let message = if body.is_empty() {
                format!("HTTP {code} from {full_url}")
            } else {
                format!("HTTP {code} from {full_url}: {body}")
            };
            return Err(Error::Fetch {
                message,
                status: Some(code),
                retry_after_seconds: retry_after,
                retryable: None,
            });
        }

        // Headers must be captured before the body consumes the response.
        let link_header = response
            .headers()
            .get("link")
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string);
        let rate_limit = parse_rate_limit_headers(response.headers());

        let body: JsonValue = serde_json::from_str(&response.text().await?)?;
        let items = self.extract_items(body)?;

        debug!("Fetched {} items from {}", items.len(), full_url);

        Ok(PageResult {
            items,
            link_header,
            rate_limit,
        })
    }
}

/// Parse `x-ratelimit-*` response headers into a snapshot.
///
/// Limit, remaining, and reset must all be present; `used` falls back to
/// `limit - remaining` when the server does not report it.
fn parse_rate_limit_headers(headers: &HeaderMap) -> Option<RateLimitSnapshot> {
    let limit = header_u64(headers, "x-ratelimit-limit")?;
    let remaining = header_u64(headers, "x-ratelimit-remaining")?;
    let reset_epoch = header_u64(headers, "x-ratelimit-reset")?;
    let used = header_u64(headers, "x-ratelimit-used").unwrap_or(limit.saturating_sub(remaining));

    Some(RateLimitSnapshot {
        limit: limit as u32,
        remaining: remaining as u32,
        used: used as u32,
        reset_epoch,
    })
}

/// Numeric header value, if present and parseable
fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers.get(name)?.to_str().ok()?.trim().parse().ok()
}
