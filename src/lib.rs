//! Post-Hydrator: turns a post identifier into a structured record
//!
//! This crate fetches the legacy-markup page of a single social-media post,
//! falling back to a proxied request when the direct one fails, and extracts
//! the author handle, display name, body text and timestamp from it.

pub mod config;
pub mod extract;
pub mod fetch;

use thiserror::Error;

/// Main error type for hydrating a post
///
/// A missing page is not an error: `hydrate` returns `Ok(None)` for it.
/// Everything here means the invocation failed outright.
#[derive(Debug, Error)]
pub enum HydrateError {
    #[error("Invalid post id '{0}': expected a non-empty string of digits")]
    InvalidPostId(String),

    #[error("URL parse error: {0}")]
    Url(#[from] ::url::ParseError),

    #[error("Response body is not valid UTF-8: {0}")]
    Decode(#[from] std::string::FromUtf8Error),

    #[error("Malformed post page: {0}")]
    Extract(#[from] ExtractError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Structural errors raised while reading fields out of a post page
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Required element missing: {field}")]
    MissingElement { field: extract::Field },

    #[error("Unparsable timestamp '{value}': {source}")]
    InvalidTimestamp {
        value: String,
        source: chrono::ParseError,
    },

    #[error("Invalid selector: {0}")]
    Selector(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for hydrate operations
pub type Result<T> = std::result::Result<T, HydrateError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for extraction operations
pub type ExtractResult<T> = std::result::Result<T, ExtractError>;

// Re-export commonly used types
pub use config::Config;
pub use extract::{parse_post, Hydrator, Post};
pub use fetch::{Fetcher, Headers};
