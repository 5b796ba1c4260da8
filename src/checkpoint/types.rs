//! Checkpoint types
//!
//! These types are serialized to JSON and persisted between runs. The file
//! layout is a stable interface; operational tooling reads it to monitor
//! pagination progress.

use crate::types::QueryOptions;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted snapshot of pagination progress.
///
/// The `page` field always names the next page to fetch, never the last
/// page fetched, so a resumed run picks up exactly where the snapshot was
/// taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Endpoint this checkpoint belongs to
    pub endpoint: String,
    /// Next page to fetch
    pub page: u32,
    /// Page size the run was using
    pub per_page: u32,
    /// Items processed so far
    pub total_processed: u64,
    /// When this snapshot was taken
    pub timestamp: DateTime<Utc>,
    /// Query options the run was started with
    #[serde(default)]
    pub options: QueryOptions,
}

impl Checkpoint {
    /// Create a checkpoint stamped with the current time
    pub fn new(
        endpoint: impl Into<String>,
        page: u32,
        per_page: u32,
        total_processed: u64,
        options: QueryOptions,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            page,
            per_page,
            total_processed,
            timestamp: Utc::now(),
            options,
        }
    }

    /// True when this checkpoint was written for the given configuration.
    /// A checkpoint from a different endpoint or page size must never be
    /// resumed against.
    pub fn matches(&self, endpoint: &str, per_page: u32) -> bool {
        self.endpoint == endpoint && self.per_page == per_page
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkpoint_matches() {
        let checkpoint = Checkpoint::new("/widgets", 4, 30, 90, QueryOptions::default());
        assert!(checkpoint.matches("/widgets", 30));
        assert!(!checkpoint.matches("/widgets", 50));
        assert!(!checkpoint.matches("/gadgets", 30));
    }

    #[test]
    fn test_checkpoint_serde_field_names() {
        let checkpoint = Checkpoint::new("/widgets", 2, 30, 30, QueryOptions::default());
        let json = serde_json::to_value(&checkpoint).unwrap();

        assert_eq!(json["endpoint"], "/widgets");
        assert_eq!(json["page"], 2);
        assert_eq!(json["per_page"], 30);
        assert_eq!(json["total_processed"], 30);
        assert!(json["timestamp"].is_string());
        assert!(json["options"].is_object());
    }

    #[test]
    fn test_checkpoint_parses_without_options() {
        let json = r#"{
            "endpoint": "/widgets",
            "page": 3,
            "per_page": 10,
            "total_processed": 20,
            "timestamp": "2024-05-01T12:00:00Z"
        }"#;
        let checkpoint: Checkpoint = serde_json::from_str(json).unwrap();
        assert_eq!(checkpoint.page, 3);
        assert!(checkpoint.options.is_empty());
    }
}
