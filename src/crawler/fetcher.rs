//! HTTP fetcher
//!
//! One client is built per run and shared by every fetch. A page is either
//! returned as text or reported as an error carrying its URL. There are no
//! retries; callers decide whether a failure is fatal.

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::CrawlError;
use reqwest::Client;
use std::time::Duration;

/// Builds the shared HTTP client
///
/// # Example
///
/// ```no_run
/// use unlocode_crawler::config::Config;
/// use unlocode_crawler::crawler::build_http_client;
///
/// let config = Config::default();
/// let client = build_http_client(&config.crawler, &config.user_agent).unwrap();
/// ```
pub fn build_http_client(
    crawler: &CrawlerConfig,
    user_agent: &UserAgentConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_secs(crawler.request_timeout_secs))
        .connect_timeout(Duration::from_secs(crawler.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches `url` and returns the response body
///
/// # Errors
///
/// * `CrawlError::Http` - transport failure (connect, timeout, body read)
/// * `CrawlError::Status` - any non-2xx response
pub async fn fetch_page(client: &Client, url: &str) -> Result<String, CrawlError> {
    tracing::debug!("Fetching {}", url);

    let response = client.get(url).send().await.map_err(|source| CrawlError::Http {
        url: url.to_string(),
        source,
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(CrawlError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|source| CrawlError::Http {
        url: url.to_string(),
        source,
    })
}
