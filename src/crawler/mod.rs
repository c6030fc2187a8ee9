//! Crawler module for page rendering and crawl orchestration
//!
//! This module contains the core crawling logic, including:
//! - Page rendering behind the `PageRenderer` trait
//! - DOM queries for images and anchors
//! - The BFS frontier with its visited set and page budget
//! - Overall crawl coordination

mod coordinator;
mod extractor;
mod frontier;
mod page;
mod renderer;

pub use coordinator::{CrawlOutcome, Coordinator};
pub use extractor::{extract_assets, ExtractedAssets};
pub use frontier::{Claim, Frontier};
pub use page::{process_page, PageRecord, ProcessedPage};
pub use renderer::{HttpRenderer, PageRenderer, RenderError, RenderedPage};

use crate::config::{validate, Config};
use crate::storage::open_storage;
use crate::SitegraphError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Validate the configuration
/// 2. Build the HTTP renderer
/// 3. Create the output root and open the logs
/// 4. Crawl breadth-first from the start URL
///
/// Steps 1-3 are fatal on failure; nothing is requested before they succeed.
/// Once crawling starts, page failures are recorded and never returned here.
///
/// # Example
///
/// ```no_run
/// use sitegraph::config::Config;
/// use sitegraph::crawler::crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::from_seed("https://example.com/", "site_map", 20);
/// let outcome = crawl(&config).await?;
/// println!("{} pages visited", outcome.visited_count());
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: &Config) -> Result<CrawlOutcome, SitegraphError> {
    validate(config)?;

    let renderer = HttpRenderer::new(&config.renderer)?;
    let mut sink = open_storage(&config.output)?;

    let coordinator = Coordinator::new(&config.crawler, &renderer, &mut sink)?;
    Ok(coordinator.run().await)
}
