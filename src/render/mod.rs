//! The page-rendering boundary
//!
//! The crawl driver never fetches anything itself; it hands a URL to a
//! [`PageRenderer`] and gets back extracted text plus the raw outbound hrefs
//! found on the page. Anything that satisfies the trait can sit behind the
//! boundary, from the bundled HTTP renderer to a full browser-automation
//! engine.

mod http;

pub use http::HttpRenderer;

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

/// A rendered page: extracted text and the outbound links found on it
///
/// Links are returned as raw href strings; the driver resolves them against
/// the page's own URL.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub text: String,
    pub links: Vec<String>,
}

/// Per-URL render failures
///
/// The driver treats every kind uniformly: the URL is recorded as a failure,
/// marked visited, and never retried.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("render timed out")]
    Timeout,

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("protocol error: {0}")]
    Protocol(String),
}

/// External capability that fetches and fully renders one page
///
/// Implementations must settle the page's content before extracting from it
/// and are expected to fail transiently; a single failed render never stops
/// the crawl.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn render(&self, url: &Url) -> Result<RenderedPage, RenderError>;
}
