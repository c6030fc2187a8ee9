//! Configuration module for Sitegraph
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every setting has a default, so a start URL is the only thing a run needs.
//!
//! # Example
//!
//! ```no_run
//! use sitegraph::config::load_validated_config;
//! use std::path::Path;
//!
//! let config = load_validated_config(Path::new("sitegraph.toml")).unwrap();
//! println!("Crawler will visit at most {} pages", config.crawler.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, GraphConfig, LogMode, OutputConfig, RendererConfig};

// Re-export parser functions
pub use parser::{load_config, load_validated_config, parse_config};
pub use validation::{validate, validate_start_url};
