use crate::config::types::{Config, FetchConfig, TargetConfig};
use crate::{ConfigError, ConfigResult};
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_target_config(&config.target)?;
    validate_fetch_config(&config.fetch)?;
    Ok(())
}

/// Validates target configuration
fn validate_target_config(config: &TargetConfig) -> ConfigResult<()> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "base_url '{}' must use http or https",
            config.base_url
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' has no host",
            config.base_url
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates transport configuration
fn validate_fetch_config(config: &FetchConfig) -> ConfigResult<()> {
    if config.timeout_secs == Some(0) {
        return Err(ConfigError::Validation(
            "timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs == Some(0) {
        return Err(ConfigError::Validation(
            "connect_timeout_secs must be >= 1".to_string(),
        ));
    }

    if let Some(proxy_url) = &config.proxy_url {
        validate_proxy_url(proxy_url)?;
    }

    Ok(())
}

/// Validates a proxy URL (http, https or socks5)
fn validate_proxy_url(proxy_url: &str) -> ConfigResult<()> {
    let url = Url::parse(proxy_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid proxy_url '{}': {}", proxy_url, e)))?;

    match url.scheme() {
        "http" | "https" | "socks5" | "socks5h" => Ok(()),
        other => Err(ConfigError::Validation(format!(
            "proxy_url scheme '{}' is not supported (use http, https or socks5)",
            other
        ))),
    }
}
