use crate::config::types::{Config, CrawlerConfig, OutputConfig};
use crate::ConfigError;
use url::Url;

/// Worksheet names are capped at 31 characters by the file format
const MAX_SHEET_NAME_LEN: usize = 31;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.worker_count < 1 || config.worker_count > 100 {
        return Err(ConfigError::Validation(format!(
            "worker_count must be between 1 and 100, got {}",
            config.worker_count
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    validate_url_template(&config.url_template)
}

/// Validates that the template has an `{id}` slot and renders to an http(s) URL
fn validate_url_template(template: &str) -> Result<(), ConfigError> {
    if !template.contains("{id}") {
        return Err(ConfigError::InvalidTemplate(format!(
            "'{}' has no {{id}} placeholder",
            template
        )));
    }

    let rendered = template.replace("{id}", "0");
    let url = Url::parse(&rendered)
        .map_err(|e| ConfigError::InvalidTemplate(format!("'{}': {}", template, e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::InvalidTemplate(format!(
            "'{}' must use http or https",
            template
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.results_path.is_empty() {
        return Err(ConfigError::Validation(
            "results_path cannot be empty".to_string(),
        ));
    }

    if config.sheet_name.is_empty() {
        return Err(ConfigError::Validation(
            "sheet_name cannot be empty".to_string(),
        ));
    }

    if config.sheet_name.chars().count() > MAX_SHEET_NAME_LEN {
        return Err(ConfigError::Validation(format!(
            "sheet_name must be at most {} characters, got '{}'",
            MAX_SHEET_NAME_LEN, config.sheet_name
        )));
    }

    Ok(())
}
