//! Configuration module for Prefix-Census
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional; omitted values fall back to the built-in
//! category and prefix set.
//!
//! # Example
//!
//! ```no_run
//! use prefix_census::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("census.toml")).unwrap();
//! println!("Scanning category {}", config.forum.category_id);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{default_prefixes, AuthConfig, Config, ForumConfig, HttpConfig, PrefixFilter};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default};
pub use validation::validate;
