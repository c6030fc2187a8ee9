//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlPhase`: lifecycle of the crawl loop (idle, running, and the terminal phases)
//! - `PageOutcome`: how processing a single page ended

mod crawl_phase;
mod page_outcome;

// Re-export main types
pub use crawl_phase::CrawlPhase;
pub use page_outcome::PageOutcome;
