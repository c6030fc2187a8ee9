//! In-memory persistence sink
//!
//! Keeps everything the filesystem sink would write. Useful for embedding the
//! crawler without touching disk, and for tests.

use crate::crawler::PageRecord;
use crate::storage::traits::{PersistenceSink, StorageResult};
use crate::url::Fingerprint;
use std::collections::HashMap;
use std::path::PathBuf;

/// One extraction log row: page, image source, link target
pub type ExtractionRow = (String, String, String);

#[derive(Debug, Default)]
pub struct MemorySink {
    /// Markup keyed by URL fingerprint
    pub markup: HashMap<Fingerprint, String>,

    /// Extraction log rows in write order
    pub rows: Vec<ExtractionRow>,

    /// Manifest entries in write order
    pub pages: Vec<PageRecord>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Link targets logged for a page
    pub fn logged_links(&self, page_url: &str) -> Vec<&str> {
        self.rows
            .iter()
            .filter(|(page, _, link)| page == page_url && !link.is_empty())
            .map(|(_, _, link)| link.as_str())
            .collect()
    }

    /// Image sources logged for a page
    pub fn logged_images(&self, page_url: &str) -> Vec<&str> {
        self.rows
            .iter()
            .filter(|(page, image, _)| page == page_url && !image.is_empty())
            .map(|(_, image, _)| image.as_str())
            .collect()
    }
}

impl PersistenceSink for MemorySink {
    fn save_markup(
        &mut self,
        url: &str,
        fingerprint: &Fingerprint,
        markup: &str,
    ) -> StorageResult<PathBuf> {
        self.markup.insert(fingerprint.clone(), markup.to_string());
        Ok(PathBuf::from(url))
    }

    fn append_extraction(
        &mut self,
        page_url: &str,
        images: &[String],
        links: &[String],
    ) -> StorageResult<()> {
        for image in images {
            self.rows
                .push((page_url.to_string(), image.clone(), String::new()));
        }
        for link in links {
            self.rows
                .push((page_url.to_string(), String::new(), link.clone()));
        }
        Ok(())
    }

    fn record_page(&mut self, record: &PageRecord) -> StorageResult<()> {
        self.pages.push(record.clone());
        Ok(())
    }

    fn flush(&mut self) -> StorageResult<()> {
        Ok(())
    }
}
