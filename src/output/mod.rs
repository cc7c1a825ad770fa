//! Append-only output sinks
//!
//! Two sinks, both opened in append mode so a resumed crawl continues the
//! same files without truncation:
//!
//! - the corpus file: one `URL: <url>\n\n<text>\n\n---\n` record per page
//! - the visited log: one canonical URL per line, written the instant the
//!   page is successfully visited (audit trail, not recovery state)
//!
//! Each record is emitted as a single `write_all`, so records stay whole
//! even if several writers ever share a file.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

/// Errors that can occur while writing output
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

fn open_append(path: &Path) -> OutputResult<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| OutputError::Open {
            path: path.to_path_buf(),
            source,
        })
}

/// The durable text corpus
pub struct CorpusWriter {
    file: File,
}

impl CorpusWriter {
    /// Opens (or creates) the corpus file for appending
    pub fn open(path: &Path) -> OutputResult<Self> {
        Ok(Self {
            file: open_append(path)?,
        })
    }

    /// Appends one complete page record
    pub fn append(&mut self, url: &Url, text: &str) -> OutputResult<()> {
        let record = format!("URL: {}\n\n{}\n\n---\n", url, text);
        self.file.write_all(record.as_bytes())?;
        self.file.flush()?;
        Ok(())
    }
}

/// The visited-URL audit log
#[derive(Debug)]
pub struct VisitedLog {
    file: File,
}

impl VisitedLog {
    /// Opens (or creates) the log file for appending
    pub fn open(path: &Path) -> OutputResult<Self> {
        Ok(Self {
            file: open_append(path)?,
        })
    }

    /// Appends one visited URL on its own line
    pub fn append(&mut self, url: &Url) -> OutputResult<()> {
        let line = format!("{}\n", url);
        self.file.write_all(line.as_bytes())?;
        self.file.flush()?;
        Ok(())
    }
}
