//! UN/LOCODE crawler
//!
//! This crate crawls the UN/LOCODE country index, extracts the per-country
//! location tables, normalizes coordinates, deduplicates locations into ports
//! and writes the resulting dataset as JSON for the search service.

pub mod config;
pub mod crawler;
pub mod geo;
pub mod html;
pub mod locode;
pub mod model;
pub mod output;
pub mod search;

use thiserror::Error;

/// Main error type for crawler operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Country index at {url} contained no countries")]
    EmptyIndex { url: String },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Dataset not found at {path}; run the crawler first")]
    DatasetMissing { path: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Country code is required")]
    EmptyCountryCode,

    #[error("Country {0} not found")]
    CountryNotFound(String),

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

/// Result type alias for crawler operations
pub type Result<T> = std::result::Result<T, CrawlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, Coordinator, CrawlOutcome, MAX_CONCURRENT_FETCHES};
pub use geo::{parse_coordinates, Coordinates};
pub use model::{Country, CountryIndexEntry, LocationRecord, Port};
