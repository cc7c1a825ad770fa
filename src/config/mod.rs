//! Configuration loading for Site-Corpus
//!
//! Settings live in an optional TOML file with kebab-case keys; every value
//! has a default matching the reference behavior (checkpoint every 120 s or
//! 100 pages, 30 s render deadline, `llm.txt` / `links_visited.txt` /
//! `state.json` in the working directory).

mod types;

pub use types::{CheckpointConfig, Config, CrawlConfig, OutputConfig, RendererConfig};

use crate::ConfigError;
use std::path::Path;

/// Loads and validates a configuration file
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to read, parse, or validate
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Checks a configuration for values that would stall or break the crawl
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.crawl.progress_every == 0 {
        return Err(ConfigError::Validation(
            "crawl.progress-every must be at least 1".to_string(),
        ));
    }
    if config.renderer.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "renderer.timeout-secs must be at least 1".to_string(),
        ));
    }
    if config.renderer.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "renderer.user-agent must not be empty".to_string(),
        ));
    }
    if config.checkpoint.interval_secs == 0 {
        return Err(ConfigError::Validation(
            "checkpoint.interval-secs must be at least 1".to_string(),
        ));
    }
    if config.checkpoint.page_threshold == 0 {
        return Err(ConfigError::Validation(
            "checkpoint.page-threshold must be at least 1".to_string(),
        ));
    }
    if config.checkpoint.path.trim().is_empty()
        || config.output.corpus_path.trim().is_empty()
        || config.output.visited_log_path.trim().is_empty()
    {
        return Err(ConfigError::Validation(
            "checkpoint and output paths must not be empty".to_string(),
        ));
    }
    Ok(())
}
