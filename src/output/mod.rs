//! Output module for crawl artifacts and reports
//!
//! This module handles:
//! - Writing the country index and country/port dataset as JSON
//! - Recording and printing crawl statistics

mod json;
pub mod stats;

pub use json::{write_countries, write_index, write_json_atomic};
pub use stats::{print_statistics, CrawlStatistics};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
