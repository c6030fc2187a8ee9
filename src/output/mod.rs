//! Output module for crawl summaries and reports
//!
//! This module handles:
//! - Collecting statistics from a finished crawl
//! - Printing them to the console
//! - Writing the markdown summary next to the other crawl artifacts

mod markdown;
pub mod stats;

pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use stats::{print_statistics, CrawlStatistics};

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// File name of the markdown summary under the output root
pub const SUMMARY_FILE: &str = "summary.md";

/// Where the markdown summary for an output root goes
pub fn summary_path(output_root: &Path) -> PathBuf {
    output_root.join(SUMMARY_FILE)
}
