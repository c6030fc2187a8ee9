use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded configuration
/// * `Err(ConfigError)` - Failed to read or parse the configuration
///
/// The result is not validated yet: command line overrides are applied on top
/// of the file first, then [`validate`] runs on the merged configuration.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use sitegraph::config::load_config;
///
/// let config = load_config(Path::new("sitegraph.toml")).unwrap();
/// println!("Max pages: {}", config.crawler.max_pages);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    Ok(config)
}

/// Loads a configuration file and validates it as-is
pub fn load_validated_config(path: &Path) -> Result<Config, ConfigError> {
    let config = load_config(path)?;
    validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogMode;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[crawler]
start-url = "https://www.example.com/"
max-pages = 50
max-concurrent-pages = 4
max-duration-secs = 120
normalize-urls = true

[renderer]
navigation-timeout-ms = 30000
quiescence-timeout-ms = 5000
user-agent = "TestCrawler/1.0"

[output]
root = "./out"
log-mode = "append"

[graph]
max-labels = 10
font-path = "/tmp/font.ttf"
"#;

        let file = create_temp_config(config_content);
        let config = load_validated_config(file.path()).unwrap();

        assert_eq!(config.start_url(), "https://www.example.com/");
        assert_eq!(config.crawler.max_pages, 50);
        assert_eq!(config.crawler.max_concurrent_pages, 4);
        assert_eq!(config.crawler.max_duration_secs, Some(120));
        assert!(config.crawler.normalize_urls);
        assert_eq!(config.renderer.navigation_timeout_ms, 30000);
        assert_eq!(config.renderer.user_agent, "TestCrawler/1.0");
        assert_eq!(config.output.root, "./out");
        assert_eq!(config.output.log_mode, LogMode::Append);
        assert_eq!(config.graph.max_labels, 10);
        assert!(config.graph.enabled);
        assert_eq!(config.graph.font_path.as_deref(), Some("/tmp/font.ttf"));
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = parse_config("[crawler]\nstart-url = \"https://example.com/\"\n").unwrap();

        assert_eq!(config.crawler.max_pages, 20);
        assert_eq!(config.crawler.max_concurrent_pages, 1);
        assert!(!config.crawler.normalize_urls);
        assert_eq!(config.renderer.navigation_timeout_ms, 60_000);
        assert_eq!(config.renderer.quiescence_timeout_ms, 15_000);
        assert_eq!(config.output.root, "site_map");
        assert_eq!(config.output.log_mode, LogMode::Truncate);
        assert_eq!(config.graph.max_labels, 20);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/sitegraph.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_unknown_log_mode_rejected() {
        let result = parse_config("[output]\nlog-mode = \"rotate\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[crawler]
start-url = "https://example.com/"
max-concurrent-pages = 0
"#;

        let file = create_temp_config(config_content);
        let result = load_validated_config(file.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
