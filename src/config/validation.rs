use crate::config::types::{Config, CrawlerConfig, GraphConfig, OutputConfig, RendererConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_renderer_config(&config.renderer)?;
    validate_output_config(&config.output)?;
    validate_graph_config(&config.graph)?;
    Ok(())
}

/// Validates crawl-control configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    let start_url = config
        .start_url
        .as_deref()
        .ok_or(ConfigError::MissingStartUrl)?;
    validate_start_url(start_url)?;

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.max_concurrent_pages < 1 || config.max_concurrent_pages > 100 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_pages must be between 1 and 100, got {}",
            config.max_concurrent_pages
        )));
    }

    if config.max_duration_secs == Some(0) {
        return Err(ConfigError::Validation(
            "max_duration_secs must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// The seed must be absolute, http(s), and carry a host
pub fn validate_start_url(start_url: &str) -> Result<(), ConfigError> {
    let url = Url::parse(start_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid start URL '{}': {}", start_url, e))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Start URL '{}' must use http or https",
            start_url
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "Start URL '{}' has no host",
            start_url
        )));
    }

    Ok(())
}

/// Validates renderer timeouts
fn validate_renderer_config(config: &RendererConfig) -> Result<(), ConfigError> {
    if config.navigation_timeout_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "navigation_timeout_ms must be >= 100ms, got {}ms",
            config.navigation_timeout_ms
        )));
    }

    if config.quiescence_timeout_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "quiescence_timeout_ms must be >= 100ms, got {}ms",
            config.quiescence_timeout_ms
        )));
    }

    if config.quiescence_timeout_ms > config.navigation_timeout_ms {
        return Err(ConfigError::Validation(format!(
            "quiescence_timeout_ms ({}ms) must not exceed navigation_timeout_ms ({}ms)",
            config.quiescence_timeout_ms, config.navigation_timeout_ms
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.root.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output root cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates graph export configuration
fn validate_graph_config(config: &GraphConfig) -> Result<(), ConfigError> {
    if config.width < 100 || config.height < 100 {
        return Err(ConfigError::Validation(format!(
            "graph image must be at least 100x100 pixels, got {}x{}",
            config.width, config.height
        )));
    }

    if config.layout_iterations < 1 {
        return Err(ConfigError::Validation(
            "layout_iterations must be >= 1".to_string(),
        ));
    }

    Ok(())
}
