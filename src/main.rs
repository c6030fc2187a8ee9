//! Sitegraph main entry point
//!
//! This is the command-line interface for the Sitegraph single-site crawler.

use anyhow::Context;
use clap::Parser;
use sitegraph::config::{load_config, validate, Config};
use sitegraph::crawler::{crawl, CrawlOutcome};
use sitegraph::graph::{export_dot, render_graph, GraphError};
use sitegraph::output::{generate_markdown_summary, print_statistics, summary_path, CrawlStatistics};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Sitegraph: crawl one website and map how its pages link together
///
/// Starting from a seed URL, Sitegraph visits same-site pages breadth-first,
/// saves their rendered markup, logs every image and link it finds, and draws
/// the page-to-page link graph.
#[derive(Parser, Debug)]
#[command(name = "sitegraph")]
#[command(version)]
#[command(about = "Crawl one website and map its internal links", long_about = None)]
struct Cli {
    /// URL to start crawling from (overrides crawler.start-url)
    #[arg(value_name = "START_URL")]
    start_url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Output directory (overrides output.root)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<String>,

    /// Maximum number of pages to visit (overrides crawler.max-pages)
    #[arg(short = 'm', long, value_name = "MAX_PAGES")]
    max_pages: Option<usize>,

    /// Pages rendered at the same time (overrides crawler.max-concurrent-pages)
    #[arg(short = 'j', long, value_name = "CONCURRENCY")]
    concurrency: Option<usize>,

    /// Validate the configuration and show what would be crawled, then exit
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(&config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitegraph=info,warn"),
            1 => EnvFilter::new("sitegraph=debug,info"),
            2 => EnvFilter::new("sitegraph=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any), applies command line overrides, validates
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(start_url) = &cli.start_url {
        config.crawler.start_url = Some(start_url.clone());
    }
    if let Some(output) = &cli.output {
        config.output.root = output.clone();
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }
    if let Some(concurrency) = cli.concurrency {
        config.crawler.max_concurrent_pages = concurrency;
    }

    validate(&config).context("Invalid configuration")?;
    Ok(config)
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Sitegraph Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Start URL: {}", config.start_url());
    println!("  Max pages: {}", config.crawler.max_pages);
    println!(
        "  Max concurrent pages: {}",
        config.crawler.max_concurrent_pages
    );
    match config.crawler.max_duration_secs {
        Some(secs) => println!("  Max duration: {}s", secs),
        None => println!("  Max duration: unlimited"),
    }
    println!("  Normalize URLs: {}", config.crawler.normalize_urls);

    println!("\nRenderer:");
    println!(
        "  Navigation timeout: {}ms",
        config.renderer.navigation_timeout_ms
    );
    println!(
        "  Quiescence timeout: {}ms",
        config.renderer.quiescence_timeout_ms
    );
    println!("  User agent: {}", config.renderer.user_agent);

    println!("\nOutput:");
    println!("  Root: {}", config.output.root);
    println!("  Log mode: {:?}", config.output.log_mode);

    println!("\nGraph:");
    if config.graph.enabled {
        println!(
            "  {}x{} px, {} labels, {} layout iterations",
            config.graph.width,
            config.graph.height,
            config.graph.max_labels,
            config.graph.layout_iterations
        );
    } else {
        println!("  disabled");
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
///
/// Only setup failures are returned; summary and graph failures are logged.
async fn handle_crawl(config: &Config) -> anyhow::Result<()> {
    let outcome = crawl(config).await.context("Crawl failed")?;

    println!(
        "\nCrawl finished in {:.2}s ({})\n",
        outcome.elapsed.as_secs_f64(),
        outcome.phase
    );

    let root = Path::new(&config.output.root);
    let stats = CrawlStatistics::from_outcome(&outcome, config.graph.max_labels);
    print_statistics(&stats);

    let summary = summary_path(root);
    match generate_markdown_summary(&stats, &summary) {
        Ok(()) => tracing::info!("Summary written to {}", summary.display()),
        Err(e) => tracing::error!("Failed to write summary: {}", e),
    }

    if config.graph.enabled {
        export_graph(&outcome, config, root);
    }

    Ok(())
}

/// Writes crawl_graph.png and crawl_graph.dot under the output root
fn export_graph(outcome: &CrawlOutcome, config: &Config, root: &Path) {
    let png = root.join("crawl_graph.png");
    match render_graph(&outcome.graph, &config.graph, &png) {
        Ok(drawn) => tracing::info!(
            "Graph with {} pages and {} edges written to {}",
            drawn.nodes,
            drawn.edges,
            png.display()
        ),
        Err(GraphError::Empty) => {
            tracing::warn!("No links between crawled pages; skipping graph export");
            return;
        }
        Err(e) => tracing::error!("Failed to render graph: {}", e),
    }

    let dot = root.join("crawl_graph.dot");
    if let Err(e) = export_dot(&outcome.graph, &dot) {
        tracing::error!("Failed to write {}: {}", dot.display(), e);
    }
}
