use crate::config::types::{Config, CrawlerConfig, ExtractConfig, OutputConfig, SiteConfig, UserAgentConfig};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_crawler_config(&config.crawler)?;
    validate_extract_config(&config.extract)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the entry URL and site-root path
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.entry_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid entry-url '{}': {}", config.entry_url, e))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "entry-url '{}' must use HTTP or HTTPS",
            config.entry_url
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "entry-url '{}' has no host",
            config.entry_url
        )));
    }

    if let Some(root) = &config.root_path {
        if !root.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "root-path must start with '/', got '{}'",
                root
            )));
        }

        let trimmed = root.trim_end_matches('/');
        let path = url.path();
        let under_root = trimmed.is_empty()
            || path == trimmed
            || path.starts_with(&format!("{}/", trimmed));
        if !under_root {
            return Err(ConfigError::Validation(format!(
                "entry-url path '{}' is not under root-path '{}'",
                path, root
            )));
        }
    } else if let Some(segment) = url
        .path_segments()
        .into_iter()
        .flatten()
        .find(|s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()))
    {
        return Err(ConfigError::Validation(format!(
            "entry-url path '{}' contains version segment '{}'; set root-path to the path before it",
            url.path(),
            segment
        )));
    }

    Ok(())
}

/// Validates budget, timeout and retry settings
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages == Some(0) {
        return Err(ConfigError::Validation(
            "max-pages must be >= 1 (omit it for an unbounded crawl)".to_string(),
        ));
    }

    if config.base_timeout_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "base-timeout-ms must be >= 100ms, got {}ms",
            config.base_timeout_ms
        )));
    }

    if config.probe_timeout_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "probe-timeout-ms must be >= 100ms, got {}ms",
            config.probe_timeout_ms
        )));
    }

    if config.max_attempts < 1 || config.max_attempts > 10 {
        return Err(ConfigError::Validation(format!(
            "max-attempts must be between 1 and 10, got {}",
            config.max_attempts
        )));
    }

    Ok(())
}

/// Validates that every configured selector parses
fn validate_extract_config(config: &ExtractConfig) -> Result<(), ConfigError> {
    config
        .include
        .iter()
        .chain(config.exclude.iter())
        .chain(std::iter::once(&config.breadcrumb))
        .chain(std::iter::once(&config.heading))
        .try_for_each(|s| validate_selector(s))
}

fn validate_selector(selector: &str) -> Result<(), ConfigError> {
    Selector::parse(selector)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidSelector(format!("'{}': {:?}", selector, e)))
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}
