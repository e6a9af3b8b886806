use serde::Deserialize;
use std::path::PathBuf;

/// The UNECE page listing every country and its UN/LOCODE sub-pages
pub const DEFAULT_INDEX_URL: &str =
    "https://unece.org/trade/cefact/unlocode-code-list-country-and-territory";

/// Main configuration structure for the crawler
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Country index page the crawl starts from
    #[serde(rename = "index-url")]
    pub index_url: String,

    /// Total per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Connect timeout (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            index_url: DEFAULT_INDEX_URL.to_string(),
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/about".to_string(),
            contact_email: "admin@example.com".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the JSON artifacts are written into
    #[serde(rename = "data-dir")]
    pub data_dir: PathBuf,

    /// File name of the raw country index artifact
    #[serde(rename = "index-file")]
    pub index_file: String,

    /// File name of the nested country/port dataset
    #[serde(rename = "countries-file")]
    pub countries_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            index_file: "country-index.json".to_string(),
            countries_file: "country.json".to_string(),
        }
    }
}

impl OutputConfig {
    pub fn index_path(&self) -> PathBuf {
        self.data_dir.join(&self.index_file)
    }

    pub fn countries_path(&self) -> PathBuf {
        self.data_dir.join(&self.countries_file)
    }
}
