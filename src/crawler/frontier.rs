//! Frontier and visited-set management
//!
//! This module handles:
//! - The FIFO queue of pending URLs (discovery order = processing order)
//! - The visited set of URL fingerprints
//! - The page budget
//!
//! Dedup happens when a URL is claimed, not when it is enqueued: the queue may
//! hold the same URL several times, and every copy after the first is dropped
//! at claim time without touching the budget. Claiming marks the fingerprint
//! visited immediately, so a URL handed to a worker can never be claimed again
//! and in-flight pages already count against the budget.

use crate::state::CrawlPhase;
use crate::url::{Fingerprint, Fingerprinter};
use std::collections::{HashSet, VecDeque};

/// A URL taken off the frontier for processing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    pub url: String,
    pub fingerprint: Fingerprint,
}

/// Work queue plus dedup set plus budget
#[derive(Debug)]
pub struct Frontier {
    /// Pending URLs, oldest first
    queue: VecDeque<String>,

    /// Fingerprints of every claimed URL; only grows
    visited: HashSet<Fingerprint>,

    /// Maximum number of fingerprints ever claimed
    max_pages: usize,

    fingerprinter: Fingerprinter,

    /// Queue entries dropped because they were already visited
    duplicates_discarded: usize,
}

impl Frontier {
    /// Creates an empty frontier with the given page budget
    pub fn new(max_pages: usize, fingerprinter: Fingerprinter) -> Self {
        Self {
            queue: VecDeque::new(),
            visited: HashSet::new(),
            max_pages,
            fingerprinter,
            duplicates_discarded: 0,
        }
    }

    /// Appends a URL to the back of the queue without any dedup
    pub fn push(&mut self, url: String) {
        self.queue.push_back(url);
    }

    /// Appends a URL unless it has already been visited
    ///
    /// Returns true if the URL was enqueued.
    pub fn push_unvisited(&mut self, url: String) -> bool {
        if self.is_visited(&url) {
            return false;
        }
        self.queue.push_back(url);
        true
    }

    /// Takes the next unvisited URL off the front of the queue
    ///
    /// Returns None when the queue is empty or the budget is used up.
    pub fn claim_next(&mut self) -> Option<Claim> {
        while !self.budget_exhausted() {
            let url = self.queue.pop_front()?;
            let fingerprint = self.fingerprinter.fingerprint(&url);

            if !self.visited.insert(fingerprint.clone()) {
                tracing::trace!("Skipping already visited {}", url);
                self.duplicates_discarded += 1;
                continue;
            }

            return Some(Claim { url, fingerprint });
        }

        None
    }

    /// Claims up to `limit` URLs in queue order
    pub fn claim_batch(&mut self, limit: usize) -> Vec<Claim> {
        let mut batch = Vec::with_capacity(limit);
        while batch.len() < limit {
            match self.claim_next() {
                Some(claim) => batch.push(claim),
                None => break,
            }
        }
        batch
    }

    /// Returns true if this URL's fingerprint has been claimed
    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(&self.fingerprinter.fingerprint(url))
    }

    /// Returns true once the visited set has reached the page budget
    pub fn budget_exhausted(&self) -> bool {
        self.visited.len() >= self.max_pages
    }

    /// Number of claimed fingerprints
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Number of queued entries, duplicates included
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn duplicates_discarded(&self) -> usize {
        self.duplicates_discarded
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    /// Terminal phase once no further claim is possible
    ///
    /// An empty queue means the crawl drained, even when the last page also
    /// used the final unit of budget; otherwise the budget stopped it.
    pub fn terminal_phase(&self) -> CrawlPhase {
        if self.queue.is_empty() {
            CrawlPhase::Drained
        } else {
            CrawlPhase::BudgetExhausted
        }
    }
}
