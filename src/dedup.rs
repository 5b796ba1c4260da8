//! Item deduplication
//!
//! Paginated APIs can repeat items across page boundaries when the
//! underlying collection shifts between fetches. The deduplicator tracks
//! every key seen during one paginator run and drops repeats. The seen-set
//! is scoped to the paginator instance and grows for its whole lifetime;
//! there is no eviction.

use crate::types::JsonValue;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Configuration for item deduplication
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupConfig {
    /// Whether deduplication is applied at all
    pub enabled: bool,
    /// Item field whose value identifies an item
    pub key_field: String,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            key_field: "id".to_string(),
        }
    }
}

impl DedupConfig {
    /// Deduplication switched off entirely
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Use a different key field
    #[must_use]
    pub fn with_key_field(mut self, field: impl Into<String>) -> Self {
        self.key_field = field.into();
        self
    }
}

/// Filters repeated items by a configured key field.
///
/// Keys are compared with type identity, so the number `1` and the string
/// `"1"` are distinct. Items without the key field (or with a null value)
/// always pass and are never recorded.
#[derive(Debug)]
pub struct Deduplicator {
    config: DedupConfig,
    seen: HashSet<String>,
}

impl Deduplicator {
    /// Create a deduplicator with the given configuration
    pub fn new(config: DedupConfig) -> Self {
        Self {
            config,
            seen: HashSet::new(),
        }
    }

    /// Filter a batch, keeping only items whose key has not been seen,
    /// and record the newly seen keys. Disabled configuration passes the
    /// batch through untouched.
    pub fn filter(&mut self, items: Vec<JsonValue>) -> Vec<JsonValue> {
        if !self.config.enabled {
            return items;
        }
        let mut kept = Vec::with_capacity(items.len());
        for item in items {
            match self.key_of(&item) {
                Some(key) => {
                    if self.seen.insert(key) {
                        kept.push(item);
                    }
                }
                None => kept.push(item),
            }
        }
        kept
    }

    /// Number of distinct keys recorded so far
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    /// Type-tagged key for an item, or None when the item has no usable key
    fn key_of(&self, item: &JsonValue) -> Option<String> {
        match item.get(&self.config.key_field) {
            None | Some(JsonValue::Null) => None,
            Some(JsonValue::String(s)) => Some(format!("s:{s}")),
            Some(JsonValue::Number(n)) => Some(format!("n:{n}")),
            Some(JsonValue::Bool(b)) => Some(format!("b:{b}")),
            Some(other) => Some(format!("j:{other}")),
        }
    }
}
