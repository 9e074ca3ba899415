//! Configuration module for Post-Hydrator
//!
//! Loading a configuration file is optional: `Config::default()` targets the
//! public site directly with the legacy user agent and no proxy tier.
//!
//! # Example
//!
//! ```no_run
//! use post_hydrator::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("hydrator.toml")).unwrap();
//! println!("Fetching posts from: {}", config.target.base_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, FetchConfig, TargetConfig, DEFAULT_BASE_URL, LEGACY_USER_AGENT,
};

// Re-export parser functions
pub use parser::{load_config, parse_config};
