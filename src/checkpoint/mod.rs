//! Checkpoint persistence module
//!
//! Handles saving and restoring pagination progress between runs.
//!
//! # Overview
//!
//! The checkpoint module provides:
//! - `Checkpoint` - a snapshot of pagination progress
//! - `CheckpointStore` - file-based persistence with atomic writes
//!
//! Checkpoints are best-effort: a failed save is logged and swallowed by
//! the paginator so resumability problems never abort a running stream.

mod store;
mod types;

pub use store::CheckpointStore;
pub use types::Checkpoint;
