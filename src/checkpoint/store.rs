//! Checkpoint store implementation
//!
//! Provides file-based checkpoint persistence with atomic writes.

use super::types::Checkpoint;
use crate::error::{Error, Result, ResultExt};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File-based checkpoint persistence.
///
/// One store owns one file. Concurrent paginators must use distinct paths;
/// two writers sharing a path will clobber each other's resume state.
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    /// Path to the checkpoint file
    path: PathBuf,
}

impl CheckpointStore {
    /// Create a store for the given path
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The checkpoint file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write a checkpoint, replacing any previous content.
    ///
    /// Parent directories are created as needed. The write goes to a temp
    /// file first and is renamed into place, so a crash mid-write cannot
    /// leave a half-written checkpoint behind.
    pub async fn save(&self, checkpoint: &Checkpoint) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| {
                        Error::checkpoint(format!("Failed to create checkpoint directory: {e}"))
                    })?;
            }
        }

        let contents = serde_json::to_string_pretty(checkpoint)
            .map_err(|e| Error::checkpoint(format!("Failed to serialize checkpoint: {e}")))?;

        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents)
            .await
            .map_err(|e| Error::checkpoint(format!("Failed to write checkpoint file: {e}")))?;

        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| Error::checkpoint(format!("Failed to rename checkpoint file: {e}")))?;

        debug!(
            "Saved checkpoint to {}: page {}, {} items processed",
            self.path.display(),
            checkpoint.page,
            checkpoint.total_processed
        );
        Ok(())
    }

    /// Load a checkpoint written for the given endpoint and page size.
    ///
    /// Missing, unreadable, corrupt, and mismatched checkpoints all come
    /// back as None; resuming never fails, it just starts cold. Anything
    /// unexpected is logged.
    pub async fn load(&self, endpoint: &str, per_page: u32) -> Option<Checkpoint> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("Failed to read checkpoint {}: {}", self.path.display(), e);
                return None;
            }
        };

        let checkpoint: Checkpoint = match serde_json::from_str(&contents) {
            Ok(checkpoint) => checkpoint,
            Err(e) => {
                warn!("Failed to parse checkpoint {}: {}", self.path.display(), e);
                return None;
            }
        };

        if !checkpoint.matches(endpoint, per_page) {
            warn!(
                "Ignoring checkpoint {}: written for '{}' with per_page {}, current run is '{}' with per_page {}",
                self.path.display(),
                checkpoint.endpoint,
                checkpoint.per_page,
                endpoint,
                per_page
            );
            return None;
        }

        debug!(
            "Loaded checkpoint from {}: resuming at page {}",
            self.path.display(),
            checkpoint.page
        );
        Some(checkpoint)
    }

    /// Read the checkpoint file without any match validation.
    ///
    /// Unlike `load`, failures surface as errors naming the file. Meant
    /// for tooling that inspects checkpoint files rather than resuming
    /// from them.
    pub async fn read(&self) -> Result<Checkpoint> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read checkpoint {}", self.path.display()))?;
        let checkpoint = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse checkpoint {}", self.path.display()))?;
        Ok(checkpoint)
    }
}
