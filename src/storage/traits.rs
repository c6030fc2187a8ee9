//! Storage traits and error types
//!
//! This module defines the trait interface for persistence sinks and
//! associated error types.

use crate::crawler::PageRecord;
use crate::url::Fingerprint;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to prepare output directory {path}: {source}")]
    OutputRoot {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Column headers of the extraction log
pub const EXTRACTION_LOG_HEADER: [&str; 3] = ["Page URL", "Image SRC", "Link HREF"];

/// Column headers of the page manifest
pub const MANIFEST_HEADER: [&str; 7] = [
    "URL",
    "Fingerprint",
    "Folder",
    "Status",
    "Images",
    "Links",
    "Error",
];

/// Trait for persistence sink implementations
///
/// The crawl loop is the only caller and calls it from one task, so
/// implementations need no internal synchronization.
pub trait PersistenceSink {
    /// Saves a page's rendered markup
    ///
    /// # Returns
    ///
    /// Where the markup was stored
    fn save_markup(
        &mut self,
        url: &str,
        fingerprint: &Fingerprint,
        markup: &str,
    ) -> StorageResult<PathBuf>;

    /// Appends one row per image, then one row per link, to the extraction log
    ///
    /// Each row carries exactly one of image source or link target; the other
    /// column is empty.
    fn append_extraction(
        &mut self,
        page_url: &str,
        images: &[String],
        links: &[String],
    ) -> StorageResult<()>;

    /// Records the final outcome of a page, processed or failed
    fn record_page(&mut self, record: &PageRecord) -> StorageResult<()>;

    /// Flushes buffered output
    fn flush(&mut self) -> StorageResult<()>;
}
