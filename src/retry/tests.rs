//! Tests for the retry policy module

use super::*;
use crate::error::{Error, Result};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

#[test]
fn test_retry_config_default() {
    let config = RetryConfig::default();
    assert_eq!(config.max_retries, 3);
    assert_eq!(config.base_delay_ms, 1000);
    assert_eq!(config.max_delay_ms, 30_000);
    assert!((config.jitter_factor - 0.1).abs() < f64::EPSILON);
    assert_eq!(config.retryable_status_codes, vec![429, 500, 502, 503, 504]);
    assert!(config.respect_retry_after);
}

#[test]
fn test_retry_config_builder() {
    let config = RetryConfig::builder()
        .max_retries(5)
        .base_delay_ms(200)
        .max_delay_ms(2000)
        .jitter_factor(0.5)
        .retryable_status_codes(vec![418])
        .respect_retry_after(false)
        .build();

    assert_eq!(config.max_retries, 5);
    assert_eq!(config.base_delay_ms, 200);
    assert_eq!(config.max_delay_ms, 2000);
    assert!((config.jitter_factor - 0.5).abs() < f64::EPSILON);
    assert_eq!(config.retryable_status_codes, vec![418]);
    assert!(!config.respect_retry_after);
}

#[test]
fn test_retry_config_builder_clamps_jitter() {
    let config = RetryConfig::builder().jitter_factor(3.0).build();
    assert!((config.jitter_factor - 1.0).abs() < f64::EPSILON);

    let config = RetryConfig::builder().jitter_factor(-1.0).build();
    assert!(config.jitter_factor.abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_success_on_first_attempt() {
    let policy = RetryPolicy::default();
    let calls = AtomicU32::new(0);

    let result: Result<u32> = policy
        .execute_with_retry(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(42) }
            },
            "test op",
        )
        .await;

    assert_eq!(result.unwrap(), 42);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_retry_bound_is_max_retries_plus_one() {
    let policy = RetryPolicy::new(
        RetryConfig::builder()
            .max_retries(3)
            .base_delay_ms(1)
            .jitter_factor(0.0)
            .build(),
    );
    let calls = AtomicU32::new(0);

    let result: Result<u32> = policy
        .execute_with_retry(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(Error::fetch_status(503, "HTTP 503")) }
            },
            "always fails",
        )
        .await;

    assert_eq!(calls.load(Ordering::SeqCst), 4);
    match result.unwrap_err() {
        Error::RetriesExhausted { attempts, source } => {
            assert_eq!(attempts, 4);
            assert_eq!(source.status(), Some(503));
        }
        other => panic!("expected RetriesExhausted, got {other:?}"),
    }
}

#[tokio::test]
async fn test_non_retryable_fails_fast() {
    let policy = RetryPolicy::new(RetryConfig::builder().base_delay_ms(1).build());
    let calls = AtomicU32::new(0);

    let result: Result<u32> = policy
        .execute_with_retry(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(Error::fetch_status(404, "HTTP 404")) }
            },
            "not found",
        )
        .await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    let err = result.unwrap_err();
    assert!(matches!(err, Error::Fetch { .. }));
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_explicit_hint_overrides_status() {
    let policy = RetryPolicy::new(
        RetryConfig::builder()
            .max_retries(2)
            .base_delay_ms(1)
            .jitter_factor(0.0)
            .build(),
    );

    // A normally terminal 404 flagged retryable keeps being retried.
    let calls = AtomicU32::new(0);
    let result: Result<u32> = policy
        .execute_with_retry(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(retryable_error("flaky 404", Some(404), None)) }
            },
            "hinted retryable",
        )
        .await;
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert!(matches!(result.unwrap_err(), Error::RetriesExhausted { .. }));

    // A normally transient 500 flagged non-retryable fails fast.
    let calls = AtomicU32::new(0);
    let result: Result<u32> = policy
        .execute_with_retry(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    Err(Error::Fetch {
                        message: "do not retry".to_string(),
                        status: Some(500),
                        retry_after_seconds: None,
                        retryable: Some(false),
                    })
                }
            },
            "hinted terminal",
        )
        .await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(matches!(result.unwrap_err(), Error::Fetch { .. }));
}

#[tokio::test]
async fn test_eventual_success() {
    let policy = RetryPolicy::new(
        RetryConfig::builder()
            .max_retries(3)
            .base_delay_ms(1)
            .jitter_factor(0.0)
            .build(),
    );
    let calls = AtomicU32::new(0);

    let result = policy
        .execute_with_retry(
            || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(Error::fetch_status(500, "HTTP 500"))
                    } else {
                        Ok(n)
                    }
                }
            },
            "flaky op",
        )
        .await;

    assert_eq!(result.unwrap(), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn test_is_retryable_rules() {
    let policy = RetryPolicy::default();

    assert!(policy.is_retryable(&Error::fetch_status(429, "")));
    assert!(policy.is_retryable(&Error::fetch_status(502, "")));
    assert!(!policy.is_retryable(&Error::fetch_status(404, "")));
    assert!(!policy.is_retryable(&Error::fetch_status(400, "")));

    // No status at all is treated as a network-level failure.
    assert!(policy.is_retryable(&Error::fetch("connection reset")));

    // Hints beat everything.
    assert!(policy.is_retryable(&retryable_error("x", Some(404), None)));
    assert!(!policy.is_retryable(&Error::non_retryable("x")));
}

#[test]
fn test_is_retryable_custom_status_set() {
    let policy = RetryPolicy::new(
        RetryConfig::builder()
            .retryable_status_codes(vec![418])
            .build(),
    );
    assert!(policy.is_retryable(&Error::fetch_status(418, "")));
    assert!(!policy.is_retryable(&Error::fetch_status(500, "")));
}

#[test]
fn test_compute_delay_exponential_growth() {
    let policy = RetryPolicy::new(
        RetryConfig::builder()
            .base_delay_ms(1000)
            .max_delay_ms(30_000)
            .jitter_factor(0.0)
            .build(),
    );
    let err = Error::fetch("no hint");

    assert_eq!(policy.compute_delay(0, &err), Duration::from_millis(1000));
    assert_eq!(policy.compute_delay(1, &err), Duration::from_millis(2000));
    assert_eq!(policy.compute_delay(2, &err), Duration::from_millis(4000));
    assert_eq!(policy.compute_delay(3, &err), Duration::from_millis(8000));
}

#[test]
fn test_compute_delay_clamps_to_max() {
    let policy = RetryPolicy::new(
        RetryConfig::builder()
            .base_delay_ms(1000)
            .max_delay_ms(5000)
            .jitter_factor(0.0)
            .build(),
    );
    let err = Error::fetch("no hint");

    assert_eq!(policy.compute_delay(3, &err), Duration::from_millis(5000));
    assert_eq!(policy.compute_delay(20, &err), Duration::from_millis(5000));

    // A large server hint is clamped the same way.
    let hinted = Error::rate_limited("slow down", Some(3600));
    assert_eq!(policy.compute_delay(0, &hinted), Duration::from_millis(5000));
}

#[test]
fn test_compute_delay_respects_retry_after() {
    let policy = RetryPolicy::new(RetryConfig::builder().jitter_factor(0.0).build());
    let hinted = Error::rate_limited("slow down", Some(7));

    // Hint wins regardless of the attempt index.
    assert_eq!(policy.compute_delay(0, &hinted), Duration::from_millis(7000));
    assert_eq!(policy.compute_delay(3, &hinted), Duration::from_millis(7000));

    // Disabled hint handling falls back to exponential backoff.
    let policy = RetryPolicy::new(
        RetryConfig::builder()
            .jitter_factor(0.0)
            .respect_retry_after(false)
            .build(),
    );
    assert_eq!(policy.compute_delay(1, &hinted), Duration::from_millis(2000));
}

#[test]
fn test_compute_delay_jitter_bounds() {
    let policy = RetryPolicy::new(
        RetryConfig::builder()
            .base_delay_ms(1000)
            .jitter_factor(0.5)
            .build(),
    );
    let err = Error::fetch("no hint");

    for _ in 0..100 {
        let delay = policy.compute_delay(0, &err);
        assert!(delay >= Duration::from_millis(1000), "delay {delay:?} below base");
        assert!(delay <= Duration::from_millis(1500), "delay {delay:?} above base + jitter");
    }
}

#[tokio::test(start_paused = true)]
async fn test_backoff_sleeps_accumulate() {
    let policy = RetryPolicy::new(
        RetryConfig::builder()
            .max_retries(2)
            .base_delay_ms(1000)
            .jitter_factor(0.0)
            .build(),
    );
    let start = tokio::time::Instant::now();

    let result: Result<u32> = policy
        .execute_with_retry(
            || async { Err(Error::fetch_status(500, "HTTP 500")) },
            "always fails",
        )
        .await;

    assert!(result.is_err());
    // 1s after the first failure, 2s after the second.
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(3000), "elapsed {elapsed:?}");
    assert!(elapsed < Duration::from_millis(3100), "elapsed {elapsed:?}");
}

#[test]
fn test_retryable_error_helper() {
    let err = retryable_error("throttled", Some(429), Some(12));
    assert_eq!(err.status(), Some(429));
    assert_eq!(err.retry_after_seconds(), Some(12));
    assert_eq!(err.retryable_hint(), Some(true));
}

#[test]
fn test_parse_retry_after_integer() {
    assert_eq!(parse_retry_after("30"), Some(30));
    assert_eq!(parse_retry_after(" 5 "), Some(5));
    assert_eq!(parse_retry_after("0"), Some(0));
}

#[test]
fn test_parse_retry_after_http_date() {
    let future = (chrono::Utc::now() + chrono::Duration::seconds(60)).to_rfc2822();
    let secs = parse_retry_after(&future).expect("future date should parse");
    assert!((58..=62).contains(&secs), "got {secs}");

    // Dates in the past clamp to zero rather than going negative.
    let past = (chrono::Utc::now() - chrono::Duration::seconds(60)).to_rfc2822();
    assert_eq!(parse_retry_after(&past), Some(0));
}

#[test]
fn test_parse_retry_after_garbage() {
    assert_eq!(parse_retry_after("not a date"), None);
    assert_eq!(parse_retry_after(""), None);
    assert_eq!(parse_retry_after("-5"), None);
}
