//! Docs-Mirror: an incremental documentation mirror
//!
//! This crate mirrors a versioned documentation site into a local corpus,
//! reusing fresh on-disk records between runs so repeated crawls only fetch
//! what changed or expired.

pub mod cache;
pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Docs-Mirror operations
///
/// Only initialization failures reach this type; page-level failures are
/// recovered inside the scheduler.
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("Failed to start fetcher: {0}")]
    Fetcher(String),
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

    #[error("Invalid CSS selector: {0}")]
    InvalidSelector(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use cache::Freshness;
pub use config::Config;
pub use crawler::{run_crawl, Coordinator, HttpFetcher, PageFetcher};
pub use output::RunStats;
pub use state::{CrawlRecord, CrawlState};
pub use crate::url::{normalize_url, SiteRoot};
