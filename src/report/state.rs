//! Per-file check state tracking
//!
//! One entry per checked file, keyed by canonicalized absolute path so
//! distinct relative spellings collapse to one entry. Entries are created
//! lazily and live for the process lifetime; the key space is bounded by
//! the number of distinct files touched in a session.

use dashmap::DashMap;
use std::path::{Path, PathBuf};

/// Check history for a single file
#[derive(Debug, Clone, Default)]
pub struct FileCheckState {
    pub error_count: usize,
    pub warning_count: usize,
    pub check_count: u32,
}

impl FileCheckState {
    /// Replace the counts, bump the check counter, and return the previous
    /// counts for delta computation
    pub fn update(&mut self, errors: usize, warnings: usize) -> (usize, usize) {
        let prev = (self.error_count, self.warning_count);
        self.error_count = errors;
        self.warning_count = warnings;
        self.check_count += 1;
        prev
    }
}

/// Concurrency-safe map from canonical path to [`FileCheckState`]
///
/// The read-modify-write of `update` happens under the map's per-entry
/// guard, so concurrent checks of the same file cannot interleave their
/// previous-vs-new count exchange. Entries for different files are
/// independent.
#[derive(Debug, Default)]
pub struct FileStateTracker {
    states: DashMap<PathBuf, FileCheckState>,
}

impl FileStateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record new counts for a file, returning the updated state snapshot
    /// and the previous counts
    pub fn record(
        &self,
        path: &Path,
        errors: usize,
        warnings: usize,
    ) -> (FileCheckState, (usize, usize)) {
        let key = canonical(path);
        let mut entry = self.states.entry(key).or_default();
        let prev = entry.update(errors, warnings);
        (entry.clone(), prev)
    }

    /// Number of files tracked so far
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

fn canonical(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
