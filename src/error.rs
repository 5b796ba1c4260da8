//! Error types for pagestream
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for pagestream
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Fetch Errors
    // ============================================================================
    /// A page fetch failed. Carries everything the retry layer needs to
    /// classify the failure: the HTTP status if one was received, a
    /// server-provided retry-after hint, and an explicit retryability
    /// override set by custom fetchers.
    #[error("Page fetch failed: {message}")]
    Fetch {
        message: String,
        status: Option<u16>,
        retry_after_seconds: Option<u64>,
        retryable: Option<bool>,
    },

    #[error("Retries exhausted after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<Error>,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Checkpoint Errors
    // ============================================================================
    #[error("Checkpoint error: {message}")]
    Checkpoint { message: String },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ============================================================================
    // Data Errors
    // ============================================================================
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a fetch error with no status (network-level failure)
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::Fetch {
            message: message.into(),
            status: None,
            retry_after_seconds: None,
            retryable: None,
        }
    }

    /// Create a fetch error carrying an HTTP status
    pub fn fetch_status(status: u16, message: impl Into<String>) -> Self {
        Self::Fetch {
            message: message.into(),
            status: Some(status),
            retry_after_seconds: None,
            retryable: None,
        }
    }

    /// Create a 429 fetch error with an optional server retry-after hint
    pub fn rate_limited(message: impl Into<String>, retry_after_seconds: Option<u64>) -> Self {
        Self::Fetch {
            message: message.into(),
            status: Some(429),
            retry_after_seconds,
            retryable: None,
        }
    }

    /// Create a fetch error explicitly marked retryable
    pub fn retryable(message: impl Into<String>) -> Self {
        Self::Fetch {
            message: message.into(),
            status: None,
            retry_after_seconds: None,
            retryable: Some(true),
        }
    }

    /// Create a fetch error explicitly marked non-retryable
    pub fn non_retryable(message: impl Into<String>) -> Self {
        Self::Fetch {
            message: message.into(),
            status: None,
            retry_after_seconds: None,
            retryable: Some(false),
        }
    }

    /// Wrap the final failure after the retry budget ran out.
    /// `attempts` counts every attempt made, including the first.
    pub fn retries_exhausted(attempts: u32, source: Error) -> Self {
        Self::RetriesExhausted {
            attempts,
            source: Box::new(source),
        }
    }

    /// Create a checkpoint error
    pub fn checkpoint(message: impl Into<String>) -> Self {
        Self::Checkpoint {
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }

    /// The HTTP status attached to this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Fetch { status, .. } => *status,
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Server-provided retry-after hint in seconds, if any
    pub fn retry_after_seconds(&self) -> Option<u64> {
        match self {
            Error::Fetch {
                retry_after_seconds,
                ..
            } => *retry_after_seconds,
            _ => None,
        }
    }

    /// Explicit retryability override, if one was set.
    /// `None` means "classify by status instead".
    pub fn retryable_hint(&self) -> Option<bool> {
        match self {
            Error::Fetch { retryable, .. } => *retryable,
            _ => None,
        }
    }

    /// Check if this error is retryable under the default rules:
    /// an explicit hint wins, then the status code is consulted, and a
    /// status-less transport failure is assumed transient.
    ///
    /// `RetryPolicy` applies the same rules but with a configurable
    /// status set.
    pub fn is_retryable(&self) -> bool {
        if let Some(hint) = self.retryable_hint() {
            return hint;
        }
        match self {
            Error::Fetch { .. } | Error::Http(_) => match self.status() {
                Some(status) => is_retryable_status(status),
                None => true,
            },
            _ => false,
        }
    }
}

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Result type alias for pagestream
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
