//! Single page processing
//!
//! Renders one URL, queries its DOM, and classifies the anchors it found.

use crate::crawler::renderer::{PageRenderer, RenderError};
use crate::state::PageOutcome;
use crate::url::{Fingerprint, LinkClassifier};

/// The structured outcome of processing one dequeued URL
///
/// Created exactly once per claimed URL and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    /// The URL as it was dequeued
    pub url: String,

    /// Dedup key of `url`
    pub fingerprint: Fingerprint,

    /// Image sources, in document order
    pub images: Vec<String>,

    /// Every anchor target, in- and out-of-scope, in document order
    pub links: Vec<String>,

    /// The in-scope subset of `links`
    pub internal_links: Vec<String>,

    pub outcome: PageOutcome,
}

impl PageRecord {
    /// Record for a page that could not be processed
    pub fn failed(url: &str, fingerprint: Fingerprint, reason: impl Into<String>) -> Self {
        Self {
            url: url.to_string(),
            fingerprint,
            images: Vec::new(),
            links: Vec::new(),
            internal_links: Vec::new(),
            outcome: PageOutcome::Failed {
                reason: reason.into(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }

    /// Anchor targets that were left out of the crawl
    pub fn external_links(&self) -> impl Iterator<Item = &String> {
        self.links
            .iter()
            .filter(move |link| !self.internal_links.contains(link))
    }
}

/// A successfully rendered page, ready to be persisted
#[derive(Debug, Clone)]
pub struct ProcessedPage {
    pub record: PageRecord,
    pub markup: String,
}

/// Renders `url` and extracts its images and links
///
/// The renderer's navigation error is returned as-is; the caller decides how
/// to record it. A quiescence timeout is not an error and shows up as
/// `PageOutcome::Processed { quiescent: false }`.
pub async fn process_page<R>(
    renderer: &R,
    classifier: &LinkClassifier,
    url: &str,
    fingerprint: Fingerprint,
) -> Result<ProcessedPage, RenderError>
where
    R: PageRenderer + ?Sized,
{
    tracing::info!("Visiting: {}", url);

    let rendered = renderer.render(url).await?;
    let assets = rendered.extract();

    let internal_links: Vec<String> = assets
        .links
        .iter()
        .filter(|link| classifier.is_internal(link))
        .cloned()
        .collect();

    tracing::debug!(
        "{}: {} images, {} links ({} internal)",
        url,
        assets.images.len(),
        assets.links.len(),
        internal_links.len()
    );

    Ok(ProcessedPage {
        record: PageRecord {
            url: url.to_string(),
            fingerprint,
            images: assets.images,
            links: assets.links,
            internal_links,
            outcome: PageOutcome::Processed {
                quiescent: rendered.quiescent,
            },
        },
        markup: rendered.markup,
    })
}
