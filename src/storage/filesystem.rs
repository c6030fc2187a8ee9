//! Filesystem persistence sink
//!
//! Layout under the output root:
//!
//! ```text
//! <root>/
//!   crawl_assets.csv            extraction log
//!   pages.csv                   page manifest
//!   pages/<label>-<fp12>/<label>.html
//! ```
//!
//! `<label>` is the sanitized URL path and `<fp12>` the first 12 hex digits of
//! the URL fingerprint, so two URLs whose paths sanitize alike still get their
//! own folders.

use crate::config::{LogMode, OutputConfig};
use crate::crawler::PageRecord;
use crate::storage::traits::{
    PersistenceSink, StorageError, StorageResult, EXTRACTION_LOG_HEADER, MANIFEST_HEADER,
};
use crate::url::{folder_label, Fingerprint};
use csv::{Writer, WriterBuilder};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

const EXTRACTION_LOG_STEM: &str = "crawl_assets";
const MANIFEST_STEM: &str = "pages";
const PAGES_DIR: &str = "pages";
const FINGERPRINT_CHARS: usize = 12;

/// Persistence sink writing markup files and CSV tables under one directory
pub struct FsSink {
    root: PathBuf,
    log_path: PathBuf,
    manifest_path: PathBuf,
    log: Writer<File>,
    manifest: Writer<File>,
}

impl FsSink {
    /// Opens the sink described by the output configuration
    pub fn create(config: &OutputConfig) -> StorageResult<Self> {
        Self::open(Path::new(&config.root), config.log_mode)
    }

    /// Creates the output root and opens both tables according to `log_mode`
    ///
    /// # Arguments
    ///
    /// * `root` - Output directory, created if missing
    /// * `log_mode` - What to do with tables left by an earlier run
    pub fn open(root: &Path, log_mode: LogMode) -> StorageResult<Self> {
        fs::create_dir_all(root.join(PAGES_DIR)).map_err(|source| StorageError::OutputRoot {
            path: root.to_path_buf(),
            source,
        })?;

        let log_path = table_path(root, EXTRACTION_LOG_STEM, log_mode);
        let manifest_path = table_path(root, MANIFEST_STEM, log_mode);

        let log = open_table(&log_path, log_mode, &EXTRACTION_LOG_HEADER)?;
        let manifest = open_table(&manifest_path, log_mode, &MANIFEST_HEADER)?;

        tracing::debug!(
            "Writing extraction log to {} and manifest to {}",
            log_path.display(),
            manifest_path.display()
        );

        Ok(Self {
            root: root.to_path_buf(),
            log_path,
            manifest_path,
            log,
            manifest,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    /// Folder (relative to the root) holding a page's markup
    pub fn page_folder(url: &str, fingerprint: &Fingerprint) -> PathBuf {
        let label = folder_label(url);
        Path::new(PAGES_DIR).join(format!("{}-{}", label, fingerprint.short(FINGERPRINT_CHARS)))
    }

    /// Absolute path of a page's markup file
    pub fn markup_path(&self, url: &str, fingerprint: &Fingerprint) -> PathBuf {
        let label = folder_label(url);
        self.root
            .join(Self::page_folder(url, fingerprint))
            .join(format!("{}.html", label))
    }
}

impl PersistenceSink for FsSink {
    fn save_markup(
        &mut self,
        url: &str,
        fingerprint: &Fingerprint,
        markup: &str,
    ) -> StorageResult<PathBuf> {
        let path = self.markup_path(url, fingerprint);
        if let Some(folder) = path.parent() {
            fs::create_dir_all(folder)?;
        }
        fs::write(&path, markup)?;
        tracing::trace!("Saved {} to {}", url, path.display());
        Ok(path)
    }

    fn append_extraction(
        &mut self,
        page_url: &str,
        images: &[String],
        links: &[String],
    ) -> StorageResult<()> {
        for image in images {
            self.log.write_record([page_url, image.as_str(), ""])?;
        }
        for link in links {
            self.log.write_record([page_url, "", link.as_str()])?;
        }
        self.log.flush()?;
        Ok(())
    }

    fn record_page(&mut self, record: &PageRecord) -> StorageResult<()> {
        let folder = if record.is_success() {
            Self::page_folder(&record.url, &record.fingerprint)
                .to_string_lossy()
                .into_owned()
        } else {
            String::new()
        };

        self.manifest.write_record([
            record.url.as_str(),
            record.fingerprint.as_str(),
            folder.as_str(),
            record.outcome.as_str(),
            record.images.len().to_string().as_str(),
            record.links.len().to_string().as_str(),
            record.outcome.failure_reason().unwrap_or_default(),
        ])?;
        self.manifest.flush()?;
        Ok(())
    }

    fn flush(&mut self) -> StorageResult<()> {
        self.log.flush()?;
        self.manifest.flush()?;
        Ok(())
    }
}

/// Where a table lives for the given mode
fn table_path(root: &Path, stem: &str, log_mode: LogMode) -> PathBuf {
    match log_mode {
        LogMode::Truncate | LogMode::Append => root.join(format!("{}.csv", stem)),
        LogMode::Versioned => {
            let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%S%.3fZ");
            root.join(format!("{}-{}.csv", stem, stamp))
        }
    }
}

/// Opens a CSV table, writing `header` unless appending to existing rows
fn open_table(path: &Path, log_mode: LogMode, header: &[&str]) -> StorageResult<Writer<File>> {
    let (file, write_header) = match log_mode {
        LogMode::Truncate | LogMode::Versioned => (File::create(path)?, true),
        LogMode::Append => {
            let is_empty = fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            (file, is_empty)
        }
    };

    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
    if write_header {
        writer.write_record(header)?;
        writer.flush()?;
    }
    Ok(writer)
}
