//! The crawl frontier
//!
//! The frontier owns the three structures that govern crawl order and
//! deduplication:
//!
//! - `pending`: FIFO queue of canonical URLs awaiting visitation
//! - `visited`: canonical URLs whose visit attempt has completed
//! - `queued`: the set of URLs currently in `pending`, kept strictly in sync
//!   so duplicate checks are O(1)
//!
//! Invariants held between every operation:
//!
//! - `queued` equals the set of elements in `pending`
//! - `visited` and `queued` are disjoint
//! - no URL appears twice in `pending`
//!
//! The frontier is single-owner: all mutation goes through `&mut self`, so a
//! caller that needs concurrent workers wraps it in one mutex and the
//! check-then-insert in [`Frontier::try_enqueue`] stays atomic.

mod snapshot;

pub use snapshot::{FrontierSnapshot, SnapshotError, SNAPSHOT_VERSION};

use std::collections::{HashSet, VecDeque};
use url::Url;

/// The combined pending/visited/queued crawl state
#[derive(Debug)]
pub struct Frontier {
    /// The crawl root; fixes the same-site scope for the whole run
    root: Url,

    /// URLs awaiting visitation, in discovery order
    pending: VecDeque<Url>,

    /// URLs whose visit attempt completed, successfully or not
    visited: HashSet<Url>,

    /// Mirror of `pending`'s contents for O(1) membership checks
    queued: HashSet<Url>,
}

impl Frontier {
    /// Creates a fresh frontier seeded with the root URL
    ///
    /// The root is immediately pending, so it is visited first and the
    /// progress total starts at one known URL.
    pub fn new(root: Url) -> Self {
        let mut pending = VecDeque::new();
        let mut queued = HashSet::new();
        pending.push_back(root.clone());
        queued.insert(root.clone());

        Self {
            root,
            pending,
            visited: HashSet::new(),
            queued,
        }
    }

    /// Rehydrates a frontier from a checkpoint snapshot
    ///
    /// The snapshot is validated before any state is built: an unsupported
    /// version, an unparseable URL, or an internally inconsistent
    /// pending/visited/queued triple is rejected rather than resumed into.
    pub fn restore(snapshot: FrontierSnapshot) -> Result<Self, SnapshotError> {
        snapshot.into_frontier()
    }

    /// The crawl root this frontier was created for
    pub fn root(&self) -> &Url {
        &self.root
    }

    /// Removes and returns the next URL to visit
    ///
    /// Returns `None` when `pending` is empty, which is the crawl-termination
    /// signal rather than an error.
    pub fn dequeue(&mut self) -> Option<Url> {
        let url = self.pending.pop_front()?;
        self.queued.remove(&url);
        Some(url)
    }

    /// Records that a visit attempt for `url` has completed
    ///
    /// Once marked, the URL can never be enqueued again for the life of the
    /// frontier.
    pub fn mark_visited(&mut self, url: Url) {
        self.visited.insert(url);
    }

    /// Adds `url` to the tail of the queue unless it is already known
    ///
    /// This is the sole deduplication gate: a URL enters `pending` only if it
    /// is neither visited nor already queued. Returns whether the enqueue
    /// happened.
    pub fn try_enqueue(&mut self, url: Url) -> bool {
        if self.visited.contains(&url) || self.queued.contains(&url) {
            return false;
        }
        self.queued.insert(url.clone());
        self.pending.push_back(url);
        true
    }

    /// Returns a deep, order-preserving copy of the state for serialization
    pub fn snapshot(&self) -> FrontierSnapshot {
        FrontierSnapshot::capture(&self.root, &self.pending, &self.visited, &self.queued)
    }

    /// Returns `(pending_count, visited_count)` for progress reporting
    ///
    /// The sum of the two is the running total of known URLs; it grows
    /// monotonically as the crawl discovers links.
    pub fn size(&self) -> (usize, usize) {
        (self.pending.len(), self.visited.len())
    }

    /// Whether any URL is still awaiting visitation
    pub fn is_exhausted(&self) -> bool {
        self.pending.is_empty()
    }

    #[cfg(test)]
    fn contents(&self) -> (&VecDeque<Url>, &HashSet<Url>, &HashSet<Url>) {
        (&self.pending, &self.visited, &self.queued)
    }
}
