//! Durable checkpointing of frontier state
//!
//! A checkpoint is the JSON-encoded [`FrontierSnapshot`] written atomically:
//! the bytes go to a sibling temporary file which is then renamed over the
//! destination, so a crash mid-save leaves either the previous checkpoint or
//! a complete new one, never a torn file.
//!
//! The store itself is policy-free; [`CheckpointTicker`] implements the
//! trigger the driver evaluates (save after a wall-clock interval or a page
//! count since the last save, whichever comes first).

use crate::frontier::{FrontierSnapshot, SnapshotError};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Errors raised by checkpoint persistence
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("checkpoint IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode checkpoint: {0}")]
    Encode(serde_json::Error),

    #[error("checkpoint file is not decodable: {0}")]
    Decode(serde_json::Error),

    #[error("invalid checkpoint: {0}")]
    Invalid(#[from] SnapshotError),
}

/// Writes and reads frontier snapshots at a fixed path
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The checkpoint file location
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Durably writes a snapshot
    ///
    /// The snapshot is encoded into `<path>.tmp`, synced, and renamed over
    /// the destination. Rename is atomic on the filesystems we target, so
    /// [`CheckpointStore::load`] never observes a partial write.
    pub fn save(&self, snapshot: &FrontierSnapshot) -> Result<(), CheckpointError> {
        let bytes = serde_json::to_vec_pretty(snapshot).map_err(CheckpointError::Encode)?;

        let tmp_path = self.tmp_path();
        let mut file = File::create(&tmp_path)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Reads the previously saved snapshot, if any
    ///
    /// A missing file is the normal fresh-crawl condition and returns
    /// `Ok(None)`. A file that exists but does not decode is an error: the
    /// operator must discard it rather than resume into unknown state.
    pub fn load(&self) -> Result<Option<FrontierSnapshot>, CheckpointError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let snapshot = serde_json::from_str(&content).map_err(CheckpointError::Decode)?;
        Ok(Some(snapshot))
    }

    fn tmp_path(&self) -> PathBuf {
        let mut os = self.path.clone().into_os_string();
        os.push(".tmp");
        PathBuf::from(os)
    }
}

/// When to take a checkpoint
#[derive(Debug, Clone, Copy)]
pub struct CheckpointPolicy {
    /// Wall-clock time between saves
    pub interval: Duration,

    /// Pages processed since the last save that force a save on their own
    pub page_threshold: u32,
}

impl Default for CheckpointPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(120),
            page_threshold: 100,
        }
    }
}

/// Tracks progress against a [`CheckpointPolicy`]
///
/// The two conditions are independent; either alone makes a save due.
#[derive(Debug)]
pub struct CheckpointTicker {
    policy: CheckpointPolicy,
    last_save: Instant,
    pages_since_save: u32,
}

impl CheckpointTicker {
    pub fn new(policy: CheckpointPolicy) -> Self {
        Self {
            policy,
            last_save: Instant::now(),
            pages_since_save: 0,
        }
    }

    /// Counts one processed page toward the threshold
    pub fn record_page(&mut self) {
        self.pages_since_save += 1;
    }

    /// Whether a save is due under either trigger condition
    pub fn is_due(&self) -> bool {
        self.last_save.elapsed() >= self.policy.interval
            || self.pages_since_save >= self.policy.page_threshold
    }

    /// Resets both counters after a successful save
    pub fn mark_saved(&mut self) {
        self.last_save = Instant::now();
        self.pages_since_save = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontier::Frontier;
    use tempfile::TempDir;
    use url::Url;

    fn sample_snapshot() -> FrontierSnapshot {
        let mut frontier = Frontier::new(Url::parse("https://a.test/").unwrap());
        let current = frontier.dequeue().unwrap();
        frontier.mark_visited(current);
        frontier.try_enqueue(Url::parse("https://a.test/x").unwrap());
        frontier.snapshot()
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = CheckpointStore::new(dir.path().join("state.json"));

        let snapshot = sample_snapshot();
        store.save(&snapshot).unwrap();

        let loaded = store.load().unwrap().expect("checkpoint should exist");
        assert_eq!(loaded.pending, snapshot.pending);
        assert_eq!(loaded.visited, snapshot.visited);
        assert_eq!(loaded.queued, snapshot.queued);
        assert_eq!(loaded.root, snapshot.root);

        let frontier = Frontier::restore(loaded).unwrap();
        assert_eq!(frontier.size(), (1, 1));
    }

    #[test]
    fn test_load_missing_file_is_fresh_crawl() {
        let dir = TempDir::new().unwrap();
        let store = CheckpointStore::new(dir.path().join("state.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        let store = CheckpointStore::new(&path);

        store.save(&sample_snapshot()).unwrap();

        assert!(path.exists());
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec![std::ffi::OsString::from("state.json")]);
    }

    #[test]
    fn test_save_replaces_previous_checkpoint() {
        let dir = TempDir::new().unwrap();
        let store = CheckpointStore::new(dir.path().join("state.json"));

        let first = sample_snapshot();
        store.save(&first).unwrap();

        let mut frontier = Frontier::restore(store.load().unwrap().unwrap()).unwrap();
        let current = frontier.dequeue().unwrap();
        frontier.mark_visited(current);
        store.save(&frontier.snapshot()).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert!(loaded.pending.is_empty());
        assert_eq!(loaded.visited.len(), 2);
    }

    #[test]
    fn test_truncated_file_is_cleanly_detected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        let store = CheckpointStore::new(&path);

        // Simulate a write torn at an arbitrary byte offset
        let full = serde_json::to_vec_pretty(&sample_snapshot()).unwrap();
        for cut in [1, full.len() / 3, full.len() - 1] {
            std::fs::write(&path, &full[..cut]).unwrap();
            assert!(
                matches!(store.load(), Err(CheckpointError::Decode(_))),
                "truncation at byte {} went undetected",
                cut
            );
        }
    }

    #[test]
    fn test_garbage_file_is_cleanly_detected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, b"not json at all").unwrap();

        let store = CheckpointStore::new(&path);
        assert!(matches!(store.load(), Err(CheckpointError::Decode(_))));
    }

    #[test]
    fn test_ticker_page_threshold() {
        let mut ticker = CheckpointTicker::new(CheckpointPolicy {
            interval: Duration::from_secs(3600),
            page_threshold: 3,
        });

        assert!(!ticker.is_due());
        ticker.record_page();
        ticker.record_page();
        assert!(!ticker.is_due());
        ticker.record_page();
        assert!(ticker.is_due());

        ticker.mark_saved();
        assert!(!ticker.is_due());
    }

    #[test]
    fn test_ticker_interval() {
        let mut ticker = CheckpointTicker::new(CheckpointPolicy {
            interval: Duration::from_millis(0),
            page_threshold: 1000,
        });

        // Zero interval means a save is always due until marked
        assert!(ticker.is_due());
        ticker.mark_saved();
        ticker.record_page();
        assert!(ticker.is_due());
    }
}
