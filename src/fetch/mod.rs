//! Page fetching module
//!
//! Defines the transport boundary between the paginator and the network.
//!
//! # Overview
//!
//! - `PageFetcher` - the injected fetch trait; the paginator performs no
//!   network I/O itself
//! - `PageRequest` / `PageResult` - one fetch in and out
//! - `HttpFetcher` - reqwest-backed implementation with response
//!   classification, rate-limit header capture, and optional client-side
//!   request pacing

mod http;
mod types;

pub use http::{HttpFetcher, HttpFetcherConfig, HttpFetcherConfigBuilder};
pub use types::{PageFetcher, PageRequest, PageResult, RateLimitSnapshot};
