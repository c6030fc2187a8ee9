//! Crawler coordinator - main crawl orchestration logic
//!
//! The coordinator is the single owner of the crawl state. It:
//! - Seeds the frontier and claims URLs from it in BFS order
//! - Renders claimed pages, up to `max-concurrent-pages` at a time
//! - Merges finished pages back in claim order (frontier, graph, sink)
//! - Decides when the crawl is over and returns the outcome
//!
//! Renders run concurrently, merging does not: every mutation of the frontier,
//! the graph and the sink happens here, between batches.

use crate::config::{validate_start_url, CrawlerConfig};
use crate::crawler::frontier::{Claim, Frontier};
use crate::crawler::page::{process_page, PageRecord, ProcessedPage};
use crate::crawler::renderer::{PageRenderer, RenderError};
use crate::graph::CrawlGraph;
use crate::state::{CrawlPhase, PageOutcome};
use crate::storage::{PersistenceSink, StorageResult};
use crate::url::{Fingerprinter, LinkClassifier};
use crate::{ConfigError, SitegraphError};
use futures::future::join_all;
use std::time::{Duration, Instant};

/// Everything a finished crawl hands back to the caller
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// The start URL
    pub seed: String,

    /// Why the crawl stopped
    pub phase: CrawlPhase,

    /// Page-to-page links between in-scope pages
    pub graph: CrawlGraph,

    /// One record per dequeued page, in claim order
    pub records: Vec<PageRecord>,

    /// Frontier entries left unprocessed when the crawl stopped
    pub abandoned: usize,

    /// Frontier entries dropped because their URL was already visited
    pub duplicates_discarded: usize,

    pub elapsed: Duration,
}

impl CrawlOutcome {
    pub fn visited_count(&self) -> usize {
        self.records.len()
    }

    pub fn processed_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.visited_count() - self.processed_count()
    }

    /// Pages processed with markup received before the quiescence wait ran out
    pub fn partial_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.outcome == PageOutcome::Processed { quiescent: false })
            .count()
    }

    /// URLs visited, in claim order
    pub fn visited_urls(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.url.as_str())
    }

    pub fn record(&self, url: &str) -> Option<&PageRecord> {
        self.records.iter().find(|r| r.url == url)
    }
}

/// Main crawler coordinator structure
pub struct Coordinator<'a, R: ?Sized, S: ?Sized> {
    renderer: &'a R,
    sink: &'a mut S,
    classifier: LinkClassifier,
    frontier: Frontier,
    graph: CrawlGraph,
    records: Vec<PageRecord>,
    phase: CrawlPhase,
    concurrency: usize,
    max_duration: Option<Duration>,
}

impl<'a, R, S> Coordinator<'a, R, S>
where
    R: PageRenderer + ?Sized,
    S: PersistenceSink + ?Sized,
{
    /// Creates a coordinator with the seed URL enqueued
    ///
    /// # Arguments
    ///
    /// * `config` - Crawl-control settings; `start-url` is required
    /// * `renderer` - Renders every claimed page
    /// * `sink` - Receives markup, extraction rows and page records
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(SitegraphError)` - Missing or unusable start URL
    pub fn new(
        config: &CrawlerConfig,
        renderer: &'a R,
        sink: &'a mut S,
    ) -> Result<Self, SitegraphError> {
        let seed = config
            .start_url
            .as_deref()
            .ok_or(ConfigError::MissingStartUrl)?;
        validate_start_url(seed)?;

        let mut frontier = Frontier::new(
            config.max_pages,
            Fingerprinter::new(config.normalize_urls),
        );
        frontier.push(seed.to_string());

        Ok(Self {
            renderer,
            sink,
            classifier: LinkClassifier::new(seed),
            frontier,
            graph: CrawlGraph::new(),
            records: Vec::new(),
            phase: CrawlPhase::Idle,
            concurrency: config.max_concurrent_pages.max(1),
            max_duration: config.max_duration_secs.map(Duration::from_secs),
        })
    }

    /// Overrides the crawl deadline
    pub fn with_max_duration(mut self, max_duration: Option<Duration>) -> Self {
        self.max_duration = max_duration;
        self
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    /// Runs the crawl loop to a terminal phase
    ///
    /// Page-level failures never end the crawl; they are recorded and the
    /// loop moves on.
    pub async fn run(mut self) -> CrawlOutcome {
        let start_time = Instant::now();
        let deadline = self.max_duration.map(|limit| start_time + limit);

        self.transition(CrawlPhase::Running);
        tracing::info!(
            "Crawling {} (max {} pages, {} at a time)",
            self.classifier.seed(),
            self.frontier.max_pages(),
            self.concurrency
        );

        loop {
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                tracing::warn!(
                    "Crawl deadline reached with {} URLs still queued",
                    self.frontier.pending()
                );
                self.transition(CrawlPhase::DeadlineReached);
                break;
            }

            let batch = self.frontier.claim_batch(self.concurrency);
            if batch.is_empty() {
                let terminal = self.frontier.terminal_phase();
                self.transition(terminal);
                break;
            }

            let results = {
                let renderer = self.renderer;
                let classifier = &self.classifier;
                join_all(batch.iter().map(|claim| {
                    process_page(renderer, classifier, &claim.url, claim.fingerprint.clone())
                }))
                .await
            };

            for (claim, result) in batch.into_iter().zip(results) {
                self.absorb(claim, result);

                let visited = self.records.len();
                if visited % 10 == 0 {
                    let rate = visited as f64 / start_time.elapsed().as_secs_f64();
                    tracing::info!(
                        "Progress: {} pages visited, {} in frontier, {:.2} pages/sec",
                        visited,
                        self.frontier.pending(),
                        rate
                    );
                }
            }
        }

        if let Err(e) = self.sink.flush() {
            tracing::error!("Failed to flush crawl output: {}", e);
        }

        let elapsed = start_time.elapsed();
        tracing::info!(
            "Crawl {}: {} pages visited in {:?}",
            self.phase,
            self.records.len(),
            elapsed
        );

        CrawlOutcome {
            seed: self.classifier.seed().to_string(),
            phase: self.phase,
            abandoned: self.frontier.pending(),
            duplicates_discarded: self.frontier.duplicates_discarded(),
            graph: self.graph,
            records: self.records,
            elapsed,
        }
    }

    /// Merges one finished page into the crawl state
    fn absorb(&mut self, claim: Claim, result: Result<ProcessedPage, RenderError>) {
        let record = match result {
            Ok(page) => match self.persist(&page) {
                Ok(()) => {
                    let record = page.record;
                    for link in &record.internal_links {
                        self.frontier.push_unvisited(link.clone());
                    }
                    self.graph
                        .record_edges(&record.url, record.internal_links.iter().cloned());
                    record
                }
                Err(e) => {
                    tracing::error!("Failed to persist {}: {}", claim.url, e);
                    PageRecord::failed(
                        &claim.url,
                        claim.fingerprint,
                        format!("Persistence failed: {}", e),
                    )
                }
            },
            Err(e) => {
                tracing::warn!("Failed to render {}: {}", claim.url, e);
                PageRecord::failed(&claim.url, claim.fingerprint, e.to_string())
            }
        };

        if let Err(e) = self.sink.record_page(&record) {
            tracing::error!("Failed to record {} in the manifest: {}", record.url, e);
        }
        self.records.push(record);
    }

    fn persist(&mut self, page: &ProcessedPage) -> StorageResult<()> {
        let record = &page.record;
        self.sink
            .save_markup(&record.url, &record.fingerprint, &page.markup)?;
        self.sink
            .append_extraction(&record.url, &record.images, &record.links)
    }

    fn transition(&mut self, next: CrawlPhase) {
        debug_assert!(self.phase.can_transition_to(next));
        tracing::debug!("Crawl phase: {} -> {}", self.phase, next);
        self.phase = next;
    }
}
