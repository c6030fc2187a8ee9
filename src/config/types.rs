use serde::Deserialize;

/// Main configuration structure for Sitegraph
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub renderer: RendererConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub graph: GraphConfig,
}

/// Crawl-control configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Absolute URL the crawl starts from
    #[serde(rename = "start-url", default)]
    pub start_url: Option<String>,

    /// Maximum number of distinct pages to visit
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: usize,

    /// Maximum number of pages rendered at the same time
    #[serde(rename = "max-concurrent-pages", default = "default_max_concurrent_pages")]
    pub max_concurrent_pages: usize,

    /// Optional wall-clock limit for the whole crawl (seconds)
    #[serde(rename = "max-duration-secs", default)]
    pub max_duration_secs: Option<u64>,

    /// Normalize URLs before fingerprinting them
    #[serde(rename = "normalize-urls", default)]
    pub normalize_urls: bool,
}

/// Page renderer configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RendererConfig {
    /// Bound on navigation (connect, request, response headers), milliseconds
    #[serde(rename = "navigation-timeout-ms", default = "default_navigation_timeout")]
    pub navigation_timeout_ms: u64,

    /// Bound on waiting for the page's network activity to settle, milliseconds
    #[serde(rename = "quiescence-timeout-ms", default = "default_quiescence_timeout")]
    pub quiescence_timeout_ms: u64,

    /// User agent sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

/// How the extraction log treats data left by an earlier run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogMode {
    /// Start a fresh log with a header on every run
    #[default]
    Truncate,
    /// Append to an existing log, writing the header only for a new file
    Append,
    /// Write each run to its own timestamped log
    Versioned,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving saved pages, logs, summary and graph
    #[serde(default = "default_output_root")]
    pub root: String,

    /// Extraction log lifecycle
    #[serde(rename = "log-mode", default)]
    pub log_mode: LogMode,
}

/// Graph export configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GraphConfig {
    /// Render the crawl graph after the crawl
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Number of most-connected pages that get a text label
    #[serde(rename = "max-labels", default = "default_max_labels")]
    pub max_labels: usize,

    /// Image width in pixels
    #[serde(default = "default_width")]
    pub width: u32,

    /// Image height in pixels
    #[serde(default = "default_height")]
    pub height: u32,

    /// Number of force-directed layout iterations
    #[serde(rename = "layout-iterations", default = "default_layout_iterations")]
    pub layout_iterations: usize,

    /// TrueType font used for labels
    #[serde(rename = "font-path", default)]
    pub font_path: Option<String>,
}

fn default_max_pages() -> usize {
    20
}

fn default_max_concurrent_pages() -> usize {
    1
}

fn default_navigation_timeout() -> u64 {
    60_000
}

fn default_quiescence_timeout() -> u64 {
    15_000
}

fn default_user_agent() -> String {
    format!("sitegraph/{}", env!("CARGO_PKG_VERSION"))
}

fn default_output_root() -> String {
    "site_map".to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_labels() -> usize {
    20
}

fn default_width() -> u32 {
    2400
}

fn default_height() -> u32 {
    1800
}

fn default_layout_iterations() -> usize {
    300
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            start_url: None,
            max_pages: default_max_pages(),
            max_concurrent_pages: default_max_concurrent_pages(),
            max_duration_secs: None,
            normalize_urls: false,
        }
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            navigation_timeout_ms: default_navigation_timeout(),
            quiescence_timeout_ms: default_quiescence_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: default_output_root(),
            log_mode: LogMode::default(),
        }
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_labels: default_max_labels(),
            width: default_width(),
            height: default_height(),
            layout_iterations: default_layout_iterations(),
            font_path: None,
        }
    }
}

impl Config {
    /// Builds a configuration from the three required inputs, everything else defaulted
    pub fn from_seed(start_url: &str, output_root: &str, max_pages: usize) -> Self {
        let mut config = Self::default();
        config.crawler.start_url = Some(start_url.to_string());
        config.crawler.max_pages = max_pages;
        config.output.root = output_root.to_string();
        config
    }

    /// The configured start URL, or an empty string when none was given
    pub fn start_url(&self) -> &str {
        self.crawler.start_url.as_deref().unwrap_or_default()
    }
}
