//! Retry policy with bounded, jittered exponential backoff
//!
//! Wraps any fallible async operation and retries transient failures up to
//! a configured bound.
//!
//! # Overview
//!
//! - **Bounded attempts**: `max_retries` retries after the initial attempt
//! - **Classification**: explicit hints win, then the status code, and a
//!   status-less failure is assumed to be network-level and transient
//! - **Server hints**: a retry-after value overrides exponential backoff
//! - **Jitter**: randomized perturbation avoids synchronized retry storms

mod policy;

pub use policy::{parse_retry_after, retryable_error, RetryConfig, RetryConfigBuilder, RetryPolicy};

#[cfg(test)]
mod tests;
