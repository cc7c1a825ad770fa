use crate::checkpoint::{CheckpointStore, CheckpointTicker};
use crate::config::Config;
use crate::crawler::CrawlPhase;
use crate::frontier::{Frontier, SnapshotError};
use crate::output::{CorpusWriter, VisitedLog};
use crate::render::{PageRenderer, RenderError};
use crate::url::{canonicalize, same_site};
use crate::{CrawlError, Result};
use std::path::Path;
use std::time::Instant;
use tokio::sync::watch;
use url::Url;

/// Orchestrates one crawl from start (or resume) to completion
///
/// The driver is the single owner of the frontier; every dequeue, enqueue and
/// visited-mark goes through `&mut self`, so the check-then-insert in the
/// dedup gate can never race.
pub struct CrawlDriver<R: PageRenderer> {
    config: Config,
    frontier: Frontier,
    renderer: R,
    corpus: CorpusWriter,
    visited_log: VisitedLog,
    store: CheckpointStore,
    ticker: CheckpointTicker,
    shutdown: watch::Receiver<bool>,
    phase: CrawlPhase,
    pages_processed: u64,
}

impl<R: PageRenderer> CrawlDriver<R> {
    /// Creates a driver, resuming from an existing checkpoint when present
    ///
    /// With `fresh` set, any existing checkpoint is ignored and the crawl
    /// starts over from `root`. On resume, a root whose site differs from
    /// the checkpoint's is rejected: silently re-scoping a half-finished
    /// crawl would break the same-site guarantee for everything already in
    /// the queue.
    pub fn new(
        config: Config,
        root: Url,
        renderer: R,
        fresh: bool,
        shutdown: watch::Receiver<bool>,
    ) -> Result<Self> {
        let store = CheckpointStore::new(&config.checkpoint.path);

        let frontier = if fresh {
            tracing::info!("Starting fresh crawl from {}", root);
            Frontier::new(root)
        } else {
            match store.load()? {
                Some(snapshot) => {
                    let frontier =
                        Frontier::restore(snapshot).map_err(crate::checkpoint::CheckpointError::from)?;
                    if !same_site(frontier.root(), &root) {
                        return Err(crate::checkpoint::CheckpointError::from(
                            SnapshotError::Inconsistent(format!(
                                "checkpoint belongs to {} but root {} was requested",
                                frontier.root(),
                                root
                            )),
                        )
                        .into());
                    }
                    let (pending, visited) = frontier.size();
                    tracing::info!(
                        "Resuming from previous state: {} visited, {} pending",
                        visited,
                        pending
                    );
                    frontier
                }
                None => {
                    tracing::info!("No checkpoint found, starting fresh crawl from {}", root);
                    Frontier::new(root)
                }
            }
        };

        let corpus = CorpusWriter::open(Path::new(&config.output.corpus_path))?;
        let visited_log = VisitedLog::open(Path::new(&config.output.visited_log_path))?;
        let ticker = CheckpointTicker::new(config.checkpoint_policy());

        Ok(Self {
            config,
            frontier,
            renderer,
            corpus,
            visited_log,
            store,
            ticker,
            shutdown,
            phase: CrawlPhase::Initializing,
            pages_processed: 0,
        })
    }

    /// The driver's current lifecycle phase
    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    /// Read access to the frontier, for progress inspection
    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    /// Runs the crawl to completion
    ///
    /// Returns when the frontier is exhausted or a stop was requested; either
    /// way a final checkpoint is taken before the driver reaches `Done`, so
    /// the state on disk always matches the state in memory at exit.
    /// A checkpoint write failure is fatal: the crawl must not keep running
    /// unrecoverable.
    pub async fn run(&mut self) -> Result<()> {
        self.phase = CrawlPhase::Running;
        let started = Instant::now();

        loop {
            if *self.shutdown.borrow() {
                tracing::info!("Stop requested, finishing current work");
                break;
            }
            if !self.step().await? {
                break;
            }

            if self.pages_processed % u64::from(self.config.crawl.progress_every) == 0 {
                self.report_progress(started);
            }
            if self.ticker.is_due() {
                self.save_checkpoint()?;
            }
        }

        self.phase = CrawlPhase::Draining;
        self.save_checkpoint()?;
        self.phase = CrawlPhase::Done;

        let (pending, visited) = self.frontier.size();
        tracing::info!(
            "Crawl finished: {} pages visited, {} pending, {:.1?} elapsed",
            visited,
            pending,
            started.elapsed()
        );
        Ok(())
    }

    /// Processes a single URL from the frontier
    ///
    /// Returns `false` when the frontier is empty, the crawl-termination
    /// signal. The URL is marked visited whether or not the render succeeds;
    /// render failures are logged and never retried.
    pub async fn step(&mut self) -> Result<bool> {
        let Some(current) = self.frontier.dequeue() else {
            return Ok(false);
        };
        tracing::debug!("Rendering {}", current);

        let rendered =
            match tokio::time::timeout(self.config.render_timeout(), self.renderer.render(&current))
                .await
            {
                Ok(result) => result,
                Err(_) => Err(RenderError::Timeout),
            };

        // Visited before link handling, so a page linking to itself cannot
        // re-enter the queue.
        self.frontier.mark_visited(current.clone());

        match rendered {
            Ok(page) => {
                if let Err(e) = self.corpus.append(&current, &page.text) {
                    tracing::error!("Failed to write corpus record for {}: {}", current, e);
                }
                if let Err(e) = self.visited_log.append(&current) {
                    tracing::error!("Failed to log visit of {}: {}", current, e);
                }
                self.enqueue_links(&current, &page.links);
            }
            Err(e) => {
                tracing::warn!(
                    "{}",
                    CrawlError::Render {
                        url: current.to_string(),
                        source: e,
                    }
                );
            }
        }

        self.pages_processed += 1;
        self.ticker.record_page();
        Ok(true)
    }

    /// Feeds a page's outbound links through the normalizer and dedup gate
    ///
    /// Malformed hrefs are dropped (logged, not fatal); off-site candidates
    /// are skipped before they ever reach the frontier.
    fn enqueue_links(&mut self, current: &Url, links: &[String]) {
        let root = self.frontier.root().clone();

        for raw in links {
            let candidate = match canonicalize(raw, Some(current)) {
                Ok(candidate) => candidate,
                Err(e) => {
                    tracing::debug!("Dropping malformed link {:?} on {}: {}", raw, current, e);
                    continue;
                }
            };

            if !same_site(&root, &candidate) {
                tracing::trace!("Skipping off-site link {}", candidate);
                continue;
            }

            if self.frontier.try_enqueue(candidate.clone()) {
                tracing::debug!("Enqueued {}", candidate);
            }
        }
    }

    fn report_progress(&self, started: Instant) {
        let (pending, visited) = self.frontier.size();
        let rate = self.pages_processed as f64 / started.elapsed().as_secs_f64().max(f64::EPSILON);
        tracing::info!(
            "Progress: {}/{} pages ({} pending), {:.2} pages/sec",
            visited,
            visited + pending,
            pending,
            rate
        );
    }

    fn save_checkpoint(&mut self) -> Result<()> {
        self.store.save(&self.frontier.snapshot())?;
        self.ticker.mark_saved();
        tracing::info!("Checkpoint saved to {}", self.store.path().display());
        Ok(())
    }
}
