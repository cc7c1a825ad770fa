//! Crawl driver - main crawl orchestration
//!
//! The driver pulls URLs from the frontier, hands them to the page renderer,
//! feeds discovered links back through the normalizer and the frontier's
//! dedup gate, appends output records, and evaluates the checkpoint trigger.

mod driver;

pub use driver::CrawlDriver;

/// The driver's lifecycle phases
///
/// `Running` loops until the frontier drains or a stop is requested;
/// `Draining` takes the final checkpoint. Per-URL failures are not a phase:
/// a failed page is logged, marked visited, and the driver stays `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlPhase {
    Initializing,
    Running,
    Draining,
    Done,
}
