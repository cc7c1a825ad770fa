//! Site-Corpus: a same-site breadth-first text harvester
//!
//! This crate crawls a single site breadth-first, extracting rendered page
//! text into an append-only corpus while checkpointing the crawl frontier so
//! an interrupted run can resume without re-visiting pages or losing queue
//! order.

pub mod checkpoint;
pub mod config;
pub mod crawler;
pub mod frontier;
pub mod output;
pub mod render;
pub mod url;

use thiserror::Error;

/// Main error type for Site-Corpus operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Checkpoint error: {0}")]
    Checkpoint(#[from] checkpoint::CheckpointError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Render error for {url}: {source}")]
    Render {
        url: String,
        source: render::RenderError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("URL has no host: {0}")]
    MissingHost(String),
}

/// Result type alias for Site-Corpus operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlDriver, CrawlPhase};
pub use frontier::{Frontier, FrontierSnapshot};
pub use render::{PageRenderer, RenderError, RenderedPage};
pub use self::url::{canonicalize, is_valid_root, same_site};
