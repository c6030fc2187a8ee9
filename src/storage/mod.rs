//! Storage module for persisting crawl data
//!
//! This module handles everything the crawl writes while it runs:
//! - Rendered markup, one file per visited page
//! - The extraction log (one row per image or link found)
//! - The page manifest (one row per dequeued page, including failures)

mod filesystem;
mod memory;
mod traits;

pub use filesystem::FsSink;
pub use memory::{ExtractionRow, MemorySink};
pub use traits::{
    PersistenceSink, StorageError, StorageResult, EXTRACTION_LOG_HEADER, MANIFEST_HEADER,
};

use crate::config::OutputConfig;
use crate::SitegraphError;

/// Opens the filesystem sink for a run
///
/// Failure here is fatal: the run aborts before any page is requested.
pub fn open_storage(config: &OutputConfig) -> Result<FsSink, SitegraphError> {
    Ok(FsSink::create(config)?)
}
