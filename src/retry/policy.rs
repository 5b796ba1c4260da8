//! Retry policy implementation

use crate::error::{Error, Result};
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration for the retry policy
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries allowed after the initial attempt
    pub max_retries: u32,
    /// Base delay for exponential backoff
    pub base_delay_ms: u64,
    /// Upper bound on any computed delay
    pub max_delay_ms: u64,
    /// Jitter fraction in 0..=1, applied on top of the delay
    pub jitter_factor: f64,
    /// HTTP status codes treated as transient
    pub retryable_status_codes: Vec<u16>,
    /// Whether server retry-after hints override exponential backoff
    pub respect_retry_after: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1000,
            max_delay_ms: 30_000,
            jitter_factor: 0.1,
            retryable_status_codes: vec![429, 500, 502, 503, 504],
            respect_retry_after: true,
        }
    }
}

impl RetryConfig {
    /// Create a new config builder
    pub fn builder() -> RetryConfigBuilder {
        RetryConfigBuilder::default()
    }
}

/// Builder for retry config
#[derive(Default)]
pub struct RetryConfigBuilder {
    config: RetryConfig,
}

impl RetryConfigBuilder {
    /// Set max retries
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// Set the base backoff delay in milliseconds
    pub fn base_delay_ms(mut self, delay: u64) -> Self {
        self.config.base_delay_ms = delay;
        self
    }

    /// Set the maximum delay in milliseconds
    pub fn max_delay_ms(mut self, delay: u64) -> Self {
        self.config.max_delay_ms = delay;
        self
    }

    /// Set the jitter fraction, clamped to 0..=1
    pub fn jitter_factor(mut self, factor: f64) -> Self {
        self.config.jitter_factor = factor.clamp(0.0, 1.0);
        self
    }

    /// Set the retryable status codes
    pub fn retryable_status_codes(mut self, codes: Vec<u16>) -> Self {
        self.config.retryable_status_codes = codes;
        self
    }

    /// Honor or ignore server retry-after hints
    pub fn respect_retry_after(mut self, respect: bool) -> Self {
        self.config.respect_retry_after = respect;
        self
    }

    /// Build the config
    pub fn build(self) -> RetryConfig {
        self.config
    }
}

/// Retries a fallible async operation with exponential backoff.
///
/// The wrapped operation may run several times, so it must be idempotent
/// or tolerant of repeated side effects. That is the caller's contract,
/// not something the policy can check.
#[derive(Debug, Clone, Default)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    /// Create a policy with the given configuration
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// The active configuration
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Run `operation`, retrying transient failures.
    ///
    /// Makes up to `max_retries + 1` attempts. A non-retryable failure is
    /// raised as-is without consuming the remaining attempts; running out
    /// of attempts raises `Error::RetriesExhausted` wrapping the last
    /// failure. `context` tags the log lines for diagnostics.
    pub async fn execute_with_retry<T, F, Fut>(&self, mut operation: F, context: &str) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt: u32 = 0;
        loop {
            match operation().await {
                Ok(value) => {
                    if attempt > 0 {
                        debug!("{} succeeded after {} attempts", context, attempt + 1);
                    }
                    return Ok(value);
                }
                Err(err) => {
                    if attempt >= self.config.max_retries {
                        warn!(
                            "{} failed, retries exhausted after {} attempts: {}",
                            context,
                            attempt + 1,
                            err
                        );
                        return Err(Error::retries_exhausted(attempt + 1, err));
                    }
                    if !self.is_retryable(&err) {
                        return Err(err);
                    }
                    let delay = self.compute_delay(attempt, &err);
                    warn!(
                        "{} failed (attempt {}/{}): {}, retrying in {:?}",
                        context,
                        attempt + 1,
                        self.config.max_retries + 1,
                        err,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Decide whether an error is worth retrying.
    ///
    /// An explicit retryability hint wins. Otherwise the status code is
    /// checked against the configured set, and an error with no status at
    /// all is treated as a network-level failure and retried.
    pub fn is_retryable(&self, error: &Error) -> bool {
        if let Some(hint) = error.retryable_hint() {
            return hint;
        }
        match error.status() {
            Some(status) => self.config.retryable_status_codes.contains(&status),
            None => true,
        }
    }

    /// Delay before the retry following `attempt` (0-based).
    ///
    /// A server retry-after hint, when present and respected, replaces the
    /// exponential base. Jitter is added on top and the result is clamped
    /// to `max_delay_ms`, floored to whole milliseconds.
    pub fn compute_delay(&self, attempt: u32, error: &Error) -> Duration {
        let hinted_ms = if self.config.respect_retry_after {
            error.retry_after_seconds().map(|secs| secs.saturating_mul(1000))
        } else {
            None
        };
        let delay_ms = hinted_ms.unwrap_or_else(|| {
            self.config
                .base_delay_ms
                .saturating_mul(2u64.saturating_pow(attempt))
        });
        let jitter = delay_ms as f64 * self.config.jitter_factor * rand::thread_rng().gen::<f64>();
        let total = (delay_ms as f64 + jitter).min(self.config.max_delay_ms as f64);
        Duration::from_millis(total.floor() as u64)
    }
}

/// Build an error pre-flagged as retryable, for fetch implementations that
/// classify failures themselves.
pub fn retryable_error(
    message: impl Into<String>,
    status: Option<u16>,
    retry_after_seconds: Option<u64>,
) -> Error {
    Error::Fetch {
        message: message.into(),
        status,
        retry_after_seconds,
        retryable: Some(true),
    }
}

/// Parse a Retry-After header value into seconds from now.
///
/// Accepts the integer-seconds form and the HTTP-date form; seconds-until
/// is clamped at zero for dates already in the past. Returns None when the
/// value is neither.
pub fn parse_retry_after(value: &str) -> Option<u64> {
    let value = value.trim();
    if let Ok(secs) = value.parse::<u64>() {
        return Some(secs);
    }
    let date = chrono::DateTime::parse_from_rfc2822(value).ok()?;
    let delta = date.timestamp() - chrono::Utc::now().timestamp();
    Some(delta.max(0) as u64)
}
