use crate::config::types::{AuthConfig, Config, ForumConfig, HttpConfig, PrefixFilter};
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_forum_config(&config.forum)?;
    validate_auth_config(&config.auth)?;
    validate_http_config(&config.http)?;
    validate_prefixes(&config.prefixes)?;
    Ok(())
}

/// Validates the forum location
fn validate_forum_config(config: &ForumConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' must use http or https",
            config.base_url
        )));
    }

    if config.category_id == 0 {
        return Err(ConfigError::Validation(
            "category_id must be >= 1".to_string(),
        ));
    }

    if config.thread_state.is_empty() {
        return Err(ConfigError::Validation(
            "thread_state cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates authentication settings
fn validate_auth_config(config: &AuthConfig) -> Result<(), ConfigError> {
    if config.cookie_name.is_empty() {
        return Err(ConfigError::Validation(
            "cookie_name cannot be empty".to_string(),
        ));
    }

    // Cookie names are RFC 6265 tokens
    if config
        .cookie_name
        .chars()
        .any(|c| c.is_whitespace() || c.is_control() || "=;,".contains(c))
    {
        return Err(ConfigError::Validation(format!(
            "cookie_name contains characters not allowed in a cookie name: '{}'",
            config.cookie_name
        )));
    }

    if config.token_path.is_empty() {
        return Err(ConfigError::Validation(
            "token_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates request decoration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agents.iter().any(|agent| agent.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "user_agents cannot contain empty entries".to_string(),
        ));
    }

    for name in config.headers.keys() {
        if name.is_empty() {
            return Err(ConfigError::Validation(
                "header names cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates the prefix filter list
fn validate_prefixes(prefixes: &[PrefixFilter]) -> Result<(), ConfigError> {
    if prefixes.is_empty() {
        return Err(ConfigError::Validation(
            "at least one prefix must be configured".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for prefix in prefixes {
        if prefix.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "prefix {} has an empty name",
                prefix.id
            )));
        }

        if prefix.id == 0 {
            return Err(ConfigError::Validation(format!(
                "prefix '{}' must have an id >= 1",
                prefix.name
            )));
        }

        if !seen.insert(prefix.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "prefix '{}' is configured twice",
                prefix.name
            )));
        }
    }

    Ok(())
}
