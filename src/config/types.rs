use crate::checkpoint::CheckpointPolicy;
use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Site-Corpus
///
/// Every field has a default, so the binary runs with no config file at all;
/// a TOML file overrides selectively.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawl: CrawlConfig,

    #[serde(default)]
    pub renderer: RendererConfig,

    #[serde(default)]
    pub checkpoint: CheckpointConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawl loop behavior
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// Emit a progress line every this many processed pages
    #[serde(rename = "progress-every", default = "default_progress_every")]
    pub progress_every: u32,
}

/// Page renderer configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RendererConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Per-render deadline in seconds; expiry counts as a page failure
    #[serde(rename = "timeout-secs", default = "default_render_timeout_secs")]
    pub timeout_secs: u64,
}

/// Checkpoint trigger and location
#[derive(Debug, Clone, Deserialize)]
pub struct CheckpointConfig {
    /// Checkpoint file path
    #[serde(default = "default_checkpoint_path")]
    pub path: String,

    /// Wall-clock seconds between saves
    #[serde(rename = "interval-secs", default = "default_checkpoint_interval_secs")]
    pub interval_secs: u64,

    /// Pages processed since the last save that force a save on their own
    #[serde(rename = "page-threshold", default = "default_checkpoint_page_threshold")]
    pub page_threshold: u32,
}

/// Output sink locations
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Corpus file path
    #[serde(rename = "corpus-path", default = "default_corpus_path")]
    pub corpus_path: String,

    /// Visited-log file path
    #[serde(rename = "visited-log-path", default = "default_visited_log_path")]
    pub visited_log_path: String,
}

impl Config {
    /// The checkpoint trigger policy this configuration describes
    pub fn checkpoint_policy(&self) -> CheckpointPolicy {
        CheckpointPolicy {
            interval: Duration::from_secs(self.checkpoint.interval_secs),
            page_threshold: self.checkpoint.page_threshold,
        }
    }

    /// The per-render deadline
    pub fn render_timeout(&self) -> Duration {
        Duration::from_secs(self.renderer.timeout_secs)
    }
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            progress_every: default_progress_every(),
        }
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_render_timeout_secs(),
        }
    }
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            path: default_checkpoint_path(),
            interval_secs: default_checkpoint_interval_secs(),
            page_threshold: default_checkpoint_page_threshold(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            corpus_path: default_corpus_path(),
            visited_log_path: default_visited_log_path(),
        }
    }
}

fn default_progress_every() -> u32 {
    10
}

fn default_user_agent() -> String {
    format!("site-corpus/{}", env!("CARGO_PKG_VERSION"))
}

fn default_render_timeout_secs() -> u64 {
    30
}

fn default_checkpoint_path() -> String {
    "state.json".to_string()
}

fn default_checkpoint_interval_secs() -> u64 {
    120
}

fn default_checkpoint_page_threshold() -> u32 {
    100
}

fn default_corpus_path() -> String {
    "llm.txt".to_string()
}

fn default_visited_log_path() -> String {
    "links_visited.txt".to_string()
}
