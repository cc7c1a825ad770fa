//! Checkpoint snapshot schema for the frontier
//!
//! The snapshot is an explicit, versioned serialization of
//! `{root, pending, visited, queued}`. `queued` is stored even though it is
//! derivable from `pending`: validating the redundancy on load is exactly the
//! consistency check that refuses a corrupt or hand-edited checkpoint.

use crate::frontier::Frontier;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use thiserror::Error;
use url::Url;

/// Current snapshot schema version
///
/// Bumped on any change to the serialized shape; older versions are refused
/// on load rather than silently reinterpreted.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Errors raised while rehydrating a snapshot into a frontier
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("unsupported snapshot version {found}")]
    Version { found: u32 },

    #[error("snapshot contains unparseable URL: {0}")]
    Url(String),

    #[error("snapshot is internally inconsistent: {0}")]
    Inconsistent(String),
}

/// A point-in-time, order-preserving copy of frontier state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrontierSnapshot {
    pub version: u32,

    /// When the snapshot was captured
    pub saved_at: DateTime<Utc>,

    /// The crawl root, so a resumed run keeps the same scope
    pub root: String,

    /// Pending URLs in visitation order
    pub pending: Vec<String>,

    /// Visited set, sorted for a stable serialized form
    pub visited: Vec<String>,

    /// In-queue set, sorted; must match `pending`'s contents exactly
    pub queued: Vec<String>,
}

impl FrontierSnapshot {
    /// Captures frontier state into the serializable schema
    pub(crate) fn capture(
        root: &Url,
        pending: &VecDeque<Url>,
        visited: &HashSet<Url>,
        queued: &HashSet<Url>,
    ) -> Self {
        let mut visited: Vec<String> = visited.iter().map(|u| u.to_string()).collect();
        visited.sort();
        let mut queued: Vec<String> = queued.iter().map(|u| u.to_string()).collect();
        queued.sort();

        Self {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            root: root.to_string(),
            pending: pending.iter().map(|u| u.to_string()).collect(),
            visited,
            queued,
        }
    }

    /// Validates the snapshot and builds a frontier from it
    ///
    /// Checks, in order: schema version, URL well-formedness, no duplicates
    /// in `pending`, `queued` == set(`pending`), and `visited` disjoint from
    /// `queued`. Any failure means the checkpoint must be discarded, not
    /// resumed.
    pub(crate) fn into_frontier(self) -> Result<Frontier, SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::Version {
                found: self.version,
            });
        }

        let root = parse(&self.root)?;
        let pending = self
            .pending
            .iter()
            .map(|s| parse(s))
            .collect::<Result<VecDeque<Url>, _>>()?;
        let visited = self
            .visited
            .iter()
            .map(|s| parse(s))
            .collect::<Result<HashSet<Url>, _>>()?;
        let queued = self
            .queued
            .iter()
            .map(|s| parse(s))
            .collect::<Result<HashSet<Url>, _>>()?;

        let pending_set: HashSet<&Url> = pending.iter().collect();
        if pending_set.len() != pending.len() {
            return Err(SnapshotError::Inconsistent(
                "duplicate URL in pending queue".to_string(),
            ));
        }
        if pending_set != queued.iter().collect::<HashSet<&Url>>() {
            return Err(SnapshotError::Inconsistent(
                "queued set does not match pending queue contents".to_string(),
            ));
        }
        if !visited.is_disjoint(&queued) {
            return Err(SnapshotError::Inconsistent(
                "URL present in both visited and queued".to_string(),
            ));
        }

        Ok(Frontier {
            root,
            pending,
            visited,
            queued,
        })
    }
}

fn parse(raw: &str) -> Result<Url, SnapshotError> {
    Url::parse(raw).map_err(|_| SnapshotError::Url(raw.to_string()))
}
