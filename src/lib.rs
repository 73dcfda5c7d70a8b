//! Prefix-Census: per-prefix thread counter for forum categories
//!
//! This crate walks every listing page of a forum category once per prefix
//! filter, counts the thread entries on each page and reports the totals.

pub mod config;
pub mod crawler;
pub mod output;
pub mod progress;
pub mod token;

use thiserror::Error;

/// Main error type for Prefix-Census operations
#[derive(Debug, Error)]
pub enum CensusError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Unexpected page layout at {url}: {source}")]
    Page {
        url: String,
        #[source]
        source: PageError,
    },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
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

/// Errors raised while loading the authentication token
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Failed to read token file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Token file {path} is empty")]
    Empty { path: String },
}

/// Transport-level failures of a single GET
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to {url} failed: {source}")]
    Request { url: String, source: reqwest::Error },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("Could not connect to {url}: {source}")]
    Connect { url: String, source: reqwest::Error },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to read response body from {url}: {source}")]
    Body { url: String, source: reqwest::Error },

    #[error("Invalid header {name}: {message}")]
    InvalidHeader { name: String, message: String },
}

/// The page does not follow the forum's listing markup
#[derive(Debug, Error)]
pub enum PageError {
    #[error("pagination control holds '{text}' instead of a page count")]
    PageCount { text: String },

    #[error("neither a sticky nor a latest threads container is present")]
    Structure,
}

/// Result type alias for Prefix-Census operations
pub type Result<T> = std::result::Result<T, CensusError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for fetch operations
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Result type alias for page analysis
pub type PageResult<T> = std::result::Result<T, PageError>;

// Re-export commonly used types
pub use config::{Config, PrefixFilter};
pub use crawler::{CategoryScanner, Document, PageAnalyzer, ScanReport, ScanResult, Website};
pub use token::{load_token, AuthToken};
