use crate::config::types::{Config, CrawlerConfig, OutputConfig, SitemapConfig, UserAgentConfig};
use crate::ConfigError;
use reqwest::header::HeaderValue;
use url::Url;

const MAX_TIMEOUT_SECS: u64 = 300;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_sitemap_config(&config.sitemap)?;
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

fn validate_sitemap_config(config: &SitemapConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.index_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid index-url '{}': {}", config.index_url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "index-url '{}' must use http or https",
            config.index_url
        )));
    }

    validate_timeout("sitemap timeout-secs", config.timeout_secs)
}

fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.sample_cap < 1 {
        return Err(ConfigError::Validation(format!(
            "sample-cap must be >= 1, got {}",
            config.sample_cap
        )));
    }

    validate_timeout("request-timeout-secs", config.request_timeout_secs)?;

    if config.run_deadline_secs == Some(0) {
        return Err(ConfigError::Validation(
            "run-deadline-secs must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.header.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent header cannot be empty".to_string(),
        ));
    }

    // Anything reqwest would refuse to put on the wire
    HeaderValue::from_str(&config.header).map_err(|_| {
        ConfigError::Validation(format!(
            "user-agent header contains invalid characters: '{}'",
            config.header
        ))
    })?;

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.client_name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "client-name cannot be empty".to_string(),
        ));
    }

    if config.report_dir.is_empty() {
        return Err(ConfigError::Validation(
            "report-dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_timeout(name: &str, secs: u64) -> Result<(), ConfigError> {
    if !(1..=MAX_TIMEOUT_SECS).contains(&secs) {
        return Err(ConfigError::Validation(format!(
            "{} must be between 1 and {}, got {}",
            name, MAX_TIMEOUT_SECS, secs
        )));
    }
    Ok(())
}
