//! Statistics derived from a finished crawl
//!
//! This module turns a `CrawlOutcome` into the numbers shown on the console
//! and in the markdown summary.

use crate::crawler::CrawlOutcome;
use crate::state::CrawlPhase;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// The start URL
    pub seed: String,

    /// Why the crawl stopped
    pub phase: CrawlPhase,

    pub finished_at: DateTime<Utc>,
    pub elapsed: Duration,

    /// Pages dequeued and handed to the renderer
    pub pages_visited: usize,

    /// Pages rendered and persisted
    pub pages_processed: usize,

    /// Processed pages whose quiescence wait timed out
    pub pages_partial: usize,

    pub pages_failed: usize,

    /// Frontier entries never processed
    pub pages_abandoned: usize,

    /// Frontier entries dropped as already visited
    pub duplicates_discarded: usize,

    pub images_found: usize,

    /// All anchor targets, in- and out-of-scope
    pub links_found: usize,

    pub internal_links: usize,
    pub external_links: usize,

    pub graph_nodes: usize,
    pub graph_edges: usize,

    /// Most connected pages with their total degree
    pub top_pages: Vec<(String, usize)>,

    /// Failed pages with their reasons, in visit order
    pub failures: Vec<(String, String)>,
}

impl CrawlStatistics {
    /// Collects statistics from a crawl outcome
    ///
    /// # Arguments
    ///
    /// * `outcome` - The finished crawl
    /// * `top_k` - How many of the most connected pages to keep
    pub fn from_outcome(outcome: &CrawlOutcome, top_k: usize) -> Self {
        let records = &outcome.records;

        let images_found = records.iter().map(|r| r.images.len()).sum();
        let links_found: usize = records.iter().map(|r| r.links.len()).sum();
        let internal_links: usize = records.iter().map(|r| r.internal_links.len()).sum();

        let failures = records
            .iter()
            .filter_map(|r| {
                r.outcome
                    .failure_reason()
                    .map(|reason| (r.url.clone(), reason.to_string()))
            })
            .collect();

        let top_pages = outcome
            .graph
            .top_by_degree(top_k)
            .into_iter()
            .map(|(url, degree)| (url.to_string(), degree))
            .collect();

        Self {
            seed: outcome.seed.clone(),
            phase: outcome.phase,
            finished_at: Utc::now(),
            elapsed: outcome.elapsed,
            pages_visited: outcome.visited_count(),
            pages_processed: outcome.processed_count(),
            pages_partial: outcome.partial_count(),
            pages_failed: outcome.failed_count(),
            pages_abandoned: outcome.abandoned,
            duplicates_discarded: outcome.duplicates_discarded,
            images_found,
            links_found,
            internal_links,
            external_links: links_found - internal_links,
            graph_nodes: outcome.graph.node_count(),
            graph_edges: outcome.graph.edge_count(),
            top_pages,
            failures,
        }
    }

    /// Share of visited pages that were processed, in percent
    pub fn success_rate(&self) -> f64 {
        if self.pages_visited == 0 {
            0.0
        } else {
            self.pages_processed as f64 / self.pages_visited as f64 * 100.0
        }
    }

    pub fn pages_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.pages_visited as f64 / secs
        } else {
            0.0
        }
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Start URL: {}", stats.seed);
    println!("  Stopped: {}", stats.phase);
    println!(
        "  Elapsed: {:.2}s ({:.2} pages/sec)",
        stats.elapsed.as_secs_f64(),
        stats.pages_per_second()
    );
    println!();

    println!("Pages:");
    println!("  Visited: {}", stats.pages_visited);
    println!("  Processed: {}", stats.pages_processed);
    if stats.pages_partial > 0 {
        println!("    (of which partial: {})", stats.pages_partial);
    }
    println!("  Failed: {}", stats.pages_failed);
    println!("  Left in frontier: {}", stats.pages_abandoned);
    println!("  Duplicates skipped: {}", stats.duplicates_discarded);
    println!();

    println!("Extraction:");
    println!("  Images: {}", stats.images_found);
    println!(
        "  Links: {} ({} internal, {} external)",
        stats.links_found, stats.internal_links, stats.external_links
    );
    println!(
        "  Graph: {} pages, {} edges",
        stats.graph_nodes, stats.graph_edges
    );
    println!();

    if !stats.failures.is_empty() {
        println!("Failures ({}):", stats.failures.len());
        for (url, reason) in stats.failures.iter().take(10) {
            println!("  - {}: {}", url, reason);
        }
        if stats.failures.len() > 10 {
            println!("  ... and {} more", stats.failures.len() - 10);
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} pages successfully processed)",
        stats.success_rate(),
        stats.pages_processed,
        stats.pages_visited
    );
}
