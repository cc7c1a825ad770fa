//! Site-Corpus command-line entry point

use anyhow::Context;
use clap::Parser;
use site_corpus::config::{load_config, Config};
use site_corpus::render::HttpRenderer;
use site_corpus::url::{canonicalize, is_valid_root};
use site_corpus::CrawlDriver;
use std::path::PathBuf;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

/// Site-Corpus: harvest a site's text into a resumable corpus
///
/// Crawls the given site breadth-first, appending each page's text to the
/// corpus file. The crawl checkpoints its frontier periodically; re-running
/// with an existing checkpoint resumes where the previous run stopped.
#[derive(Parser, Debug)]
#[command(name = "site-corpus")]
#[command(version)]
#[command(about = "Same-site text harvester with resumable crawl state", long_about = None)]
struct Cli {
    /// Root URL to crawl (scheme and host required)
    #[arg(value_name = "URL")]
    root: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Start a fresh crawl, ignoring any existing checkpoint
    #[arg(long)]
    fresh: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    if !is_valid_root(&cli.root) {
        anyhow::bail!(
            "invalid root URL {:?}: an absolute URL with scheme and host is required, e.g. https://example.com/",
            cli.root
        );
    }
    let root = canonicalize(&cli.root, None)?;

    let config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => Config::default(),
    };

    let renderer = HttpRenderer::new(&config.renderer.user_agent, config.render_timeout())
        .context("failed to build HTTP client")?;

    // Cooperative stop on Ctrl-C: the driver finishes the page in flight,
    // takes a final checkpoint, and exits cleanly.
    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, stopping after the current page");
            let _ = stop_tx.send(true);
        }
    });

    let corpus_path = config.output.corpus_path.clone();
    let visited_log_path = config.output.visited_log_path.clone();

    let mut driver = CrawlDriver::new(config, root, renderer, cli.fresh, stop_rx)?;
    driver.run().await?;

    println!("Extraction completed. Content saved to {}", corpus_path);
    println!("Visited links saved to {}", visited_log_path);
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_corpus=info,warn"),
            1 => EnvFilter::new("site_corpus=debug,info"),
            2 => EnvFilter::new("site_corpus=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
