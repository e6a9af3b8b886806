//! Crawler module for the UN/LOCODE pages
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching
//! - Country index extraction
//! - Per-country location record extraction
//! - Bounded fan-out, merge and deduplication

mod coordinator;
mod fetcher;
mod index;
mod records;

pub use coordinator::{merge_ports, run_crawl, Coordinator, CrawlOutcome, MAX_CONCURRENT_FETCHES};
pub use fetcher::{build_http_client, fetch_page};
pub use index::{fetch_country_index, parse_country_index};
pub use records::{fetch_location_records, parse_location_records, LOCATION_COLUMNS};

use crate::config::Config;
use crate::CrawlError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client
/// 2. Fetch the country index
/// 3. Fetch every detail link with at most three requests in flight
/// 4. Merge records into ports per country, in index order
/// 5. Write the index and country artifacts
pub async fn crawl(config: Config) -> Result<CrawlOutcome, CrawlError> {
    run_crawl(config).await
}
