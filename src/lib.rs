//! url-crawler: a single-domain site inventory crawler
//!
//! This crate crawls a website breadth-first from a root URL, stays inside the
//! root's domain, and records every outbound link and image found on each
//! visited page.

pub mod config;
pub mod crawler;
pub mod inventory;
pub mod output;
pub mod scope;

use thiserror::Error;

/// Main error type for url-crawler operations
///
/// Nothing inside the crawl engine itself is fatal; these errors come from
/// setting a crawl up (configuration, HTTP client) and presenting its result.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Scope error: {0}")]
    Scope(#[from] ScopeError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
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

/// Reasons a URL is not eligible for crawling
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    #[error("Failed to parse URL '{url}': {source}")]
    Unparseable {
        url: String,
        source: ::url::ParseError,
    },

    #[error("URL has no host: {url}")]
    MissingHost { url: String },

    #[error("URL host '{host}' has an empty label: {url}")]
    EmptyHostLabel { url: String, host: String },

    #[error("URL '{url}' is outside the root domain (token '{token}')")]
    OffDomain { url: String, token: String },
}

/// Result type alias for url-crawler operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlReport, Crawler, HttpFetcher, PageFetcher, Termination};
pub use inventory::{CrawlResult, PageRecord, ReferenceKind};
pub use scope::{domain_token, DomainScope, ScopePolicy};
