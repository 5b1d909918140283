use crate::config::types::{Config, CrawlDefaults, ServiceConfig, StorageConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_service_config(&config.service)?;
    validate_storage_config(&config.storage)?;
    validate_crawl_defaults(&config.crawl)?;
    Ok(())
}

/// Validates crawl service connection settings
fn validate_service_config(config: &ServiceConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.endpoint)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid endpoint '{}': {}", config.endpoint, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Endpoint '{}' must use http or https",
            config.endpoint
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect_timeout_secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    Ok(())
}

/// Validates storage settings
fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if !config.dev_mode && config.storage_root.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "storage_root cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates crawl defaults
fn validate_crawl_defaults(config: &CrawlDefaults) -> Result<(), ConfigError> {
    if config.default_depth < 1 {
        return Err(ConfigError::Validation(format!(
            "default_depth must be >= 1, got {}",
            config.default_depth
        )));
    }

    if config.default_max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "default_max_pages must be >= 1, got {}",
            config.default_max_pages
        )));
    }

    Ok(())
}
