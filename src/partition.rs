/*!
 * Deterministic work partitioning across independent runs.
 *
 * Every document path is hashed to a batch index in `[0, total)`. Running
 * one process per index over the same file set translates each document
 * exactly once, with no coordination between processes.
 */

use sha2::{Digest, Sha256};
use std::path::Path;

use crate::errors::AppError;

/// Normalize a path for hashing: relative to `root` when possible,
/// forward slashes, no leading `./`
pub fn normalize_path(path: &Path, root: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let normalized = relative.to_string_lossy().replace('\\', "/");
    normalized.trim_start_matches("./").to_string()
}

/// Batch index of a normalized path
pub fn batch_index(normalized_path: &str, total: usize) -> usize {
    if total <= 1 {
        return 0;
    }
    let digest = Sha256::digest(normalized_path.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    (u64::from_be_bytes(prefix) % total as u64) as usize
}

/// Which shard of the file set this run is responsible for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSelection {
    pub current: usize,
    pub total: usize,
}

impl Default for BatchSelection {
    fn default() -> Self {
        Self { current: 0, total: 1 }
    }
}

impl BatchSelection {
    /// Create a selection; `current` must be below a non-zero `total`
    pub fn new(current: usize, total: usize) -> Result<Self, AppError> {
        if total == 0 {
            return Err(AppError::MissingConfiguration(
                "batch total must be at least 1".to_string(),
            ));
        }
        if current >= total {
            return Err(AppError::MissingConfiguration(format!(
                "batch current ({}) must be lower than batch total ({})",
                current, total
            )));
        }
        Ok(Self { current, total })
    }

    /// Whether this selection covers the whole file set
    pub fn is_everything(&self) -> bool {
        self.total == 1
    }

    /// Whether the normalized path belongs to this shard
    pub fn includes(&self, normalized_path: &str) -> bool {
        batch_index(normalized_path, self.total) == self.current
    }
}

/// Keep the paths under `root` that belong to `selection`, preserving order
pub fn partition<P: AsRef<Path>>(paths: Vec<P>, root: &Path, selection: &BatchSelection) -> Vec<P> {
    paths
        .into_iter()
        .filter(|p| selection.includes(&normalize_path(p.as_ref(), root)))
        .collect()
}
