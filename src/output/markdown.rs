//! Markdown summary generation
//!
//! This module generates a human-readable markdown summary of a crawl: run
//! information, page counts, the most connected pages and the failures.

use crate::output::stats::CrawlStatistics;
use crate::output::OutputResult;
use std::fs::File;
use std::io::Write;
use std::path::Path;

const MAX_FAILURES_LISTED: usize = 50;

/// Writes the markdown summary to `output_path`
///
/// # Arguments
///
/// * `stats` - Statistics of the finished crawl
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(OutputError)` - Failed to write summary
pub fn generate_markdown_summary(stats: &CrawlStatistics, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(stats);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats crawl statistics as markdown
pub fn format_markdown_summary(stats: &CrawlStatistics) -> String {
    let mut md = String::new();

    md.push_str("# Sitegraph Crawl Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Start URL**: {}\n", stats.seed));
    md.push_str(&format!(
        "- **Finished**: {}\n",
        stats.finished_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    md.push_str(&format!(
        "- **Duration**: {:.2} seconds ({:.2} pages/sec)\n",
        stats.elapsed.as_secs_f64(),
        stats.pages_per_second()
    ));
    md.push_str(&format!("- **Stopped**: {}\n\n", stats.phase));

    // Page counts
    md.push_str("## Pages\n\n");
    md.push_str("| Outcome | Count |\n");
    md.push_str("|---------|-------|\n");
    md.push_str(&format!("| Visited | {} |\n", stats.pages_visited));
    md.push_str(&format!("| Processed | {} |\n", stats.pages_processed));
    md.push_str(&format!("| Partial render | {} |\n", stats.pages_partial));
    md.push_str(&format!("| Failed | {} |\n", stats.pages_failed));
    md.push_str(&format!("| Left in frontier | {} |\n", stats.pages_abandoned));
    md.push_str(&format!(
        "| Duplicates skipped | {} |\n\n",
        stats.duplicates_discarded
    ));
    md.push_str(&format!(
        "- **Success Rate**: {:.2}%\n\n",
        stats.success_rate()
    ));

    // Extraction
    md.push_str("## Extraction\n\n");
    md.push_str(&format!("- **Images**: {}\n", stats.images_found));
    md.push_str(&format!("- **Links**: {}\n", stats.links_found));
    md.push_str(&format!("- **Internal links**: {}\n", stats.internal_links));
    md.push_str(&format!("- **External links**: {}\n", stats.external_links));
    md.push_str(&format!(
        "- **Graph**: {} pages, {} edges\n\n",
        stats.graph_nodes, stats.graph_edges
    ));

    if !stats.top_pages.is_empty() {
        md.push_str("## Most Connected Pages\n\n");
        md.push_str("| Page | Degree |\n");
        md.push_str("|------|--------|\n");
        for (url, degree) in &stats.top_pages {
            md.push_str(&format!("| {} | {} |\n", url, degree));
        }
        md.push('\n');
    }

    if !stats.failures.is_empty() {
        md.push_str("## Failures\n\n");
        md.push_str("| Page | Reason |\n");
        md.push_str("|------|--------|\n");
        for (url, reason) in stats.failures.iter().take(MAX_FAILURES_LISTED) {
            md.push_str(&format!("| {} | {} |\n", url, reason.replace('|', "\\|")));
        }
        if stats.failures.len() > MAX_FAILURES_LISTED {
            md.push_str(&format!(
                "\n... and {} more\n",
                stats.failures.len() - MAX_FAILURES_LISTED
            ));
        }
        md.push('\n');
    }

    md
}
