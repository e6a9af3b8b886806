//! Crawl coordinator
//!
//! Drives the whole run: one index fetch, then every detail link of every
//! country through a single semaphore-bounded pool, then the per-country
//! merge. Fetches complete in any order; results land in slots addressed by
//! `(country, link)` so the output keeps index order.

use crate::config::Config;
use crate::crawler::fetcher::build_http_client;
use crate::crawler::index::fetch_country_index;
use crate::crawler::records::fetch_location_records;
use crate::model::{Country, CountryIndexEntry, LocationRecord, Port};
use crate::output::{write_countries, write_index, CrawlStatistics};
use crate::CrawlError;
use chrono::Utc;
use reqwest::Client;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

/// Detail fetches in flight at once, across all countries and links
pub const MAX_CONCURRENT_FETCHES: usize = 3;

/// Everything a completed crawl produced
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    pub index: Vec<CountryIndexEntry>,
    pub countries: Vec<Country>,
    pub statistics: CrawlStatistics,
}

/// Records fetched for one country, one slot per detail link
type LinkSlots = Vec<Option<Vec<LocationRecord>>>;

type FetchHandle = JoinHandle<Result<Vec<LocationRecord>, CrawlError>>;

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Config,
    client: Client,
}

impl Coordinator {
    /// Creates a coordinator with a freshly built HTTP client
    pub fn new(config: Config) -> Result<Self, CrawlError> {
        let client = build_http_client(&config.crawler, &config.user_agent)?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fetches the country index (fatal on failure)
    pub async fn fetch_index(&self) -> Result<Vec<CountryIndexEntry>, CrawlError> {
        fetch_country_index(&self.client, &self.config.crawler.index_url).await
    }

    /// Runs the crawl in memory: index, detail pages, merge
    pub async fn crawl(&self) -> Result<CrawlOutcome, CrawlError> {
        let started_at = Utc::now();
        tracing::info!("Fetching country index {}", self.config.crawler.index_url);

        let index = self.fetch_index().await?;
        let mut statistics = CrawlStatistics::new(started_at);

        let slots = self.fetch_all_links(&index, &mut statistics).await;

        let countries: Vec<Country> = index
            .iter()
            .zip(slots)
            .map(|(entry, links)| Country {
                code: entry.country_code.clone(),
                name: entry.display_name.clone(),
                ports: merge_ports(links.iter().flatten().flatten()),
            })
            .collect();

        statistics.finish(&countries);

        Ok(CrawlOutcome {
            index,
            countries,
            statistics,
        })
    }

    /// Fetches every detail link through one pool of
    /// [`MAX_CONCURRENT_FETCHES`] and returns the records per country and link
    ///
    /// Every link gets its own task; a shared semaphore bounds how many are
    /// fetching at once. Handles are awaited in index order, so the slots do
    /// not depend on completion order. A failed link leaves its slot empty and
    /// is only logged.
    async fn fetch_all_links(
        &self,
        index: &[CountryIndexEntry],
        statistics: &mut CrawlStatistics,
    ) -> Vec<LinkSlots> {
        let semaphore = Arc::new(Semaphore::new(MAX_CONCURRENT_FETCHES));

        let handles: Vec<Vec<(&str, FetchHandle)>> = index
            .iter()
            .map(|entry| {
                entry
                    .detail_links
                    .iter()
                    .map(|url| (url.as_str(), self.spawn_fetch(url, semaphore.clone())))
                    .collect()
            })
            .collect();

        let mut slots: Vec<LinkSlots> = Vec::with_capacity(handles.len());
        for links in handles {
            let mut country_slots: LinkSlots = Vec::with_capacity(links.len());
            for (url, handle) in links {
                statistics.links_attempted += 1;
                match handle.await {
                    Ok(Ok(records)) => {
                        statistics.records_extracted += records.len();
                        country_slots.push(Some(records));
                    }
                    Ok(Err(_)) => {
                        statistics.links_failed += 1;
                        country_slots.push(None);
                    }
                    Err(e) => {
                        tracing::warn!("Fetch task for {} did not complete: {}", url, e);
                        statistics.links_failed += 1;
                        country_slots.push(None);
                    }
                }
            }
            slots.push(country_slots);
        }

        slots
    }

    /// Spawns one detail fetch that waits for a pool permit first
    fn spawn_fetch(&self, url: &str, semaphore: Arc<Semaphore>) -> FetchHandle {
        let client = self.client.clone();
        let url = url.to_string();

        tokio::spawn(async move {
            // the semaphore is never closed, so acquiring only fails on shutdown
            let _permit = semaphore.acquire_owned().await.ok();

            let result = fetch_location_records(&client, &url).await;
            match &result {
                Ok(records) => tracing::info!("{} is ok ({} records)", url, records.len()),
                Err(e) => tracing::warn!("Skipping {}: {}", url, e),
            }
            result
        })
    }
}

/// Deduplicates location records into ports by LOCODE
///
/// Records without a LOCODE or a usable name are skipped; the first record
/// seen for a LOCODE wins and later duplicates are ignored.
pub fn merge_ports<'a, I>(records: I) -> Vec<Port>
where
    I: IntoIterator<Item = &'a LocationRecord>,
{
    let mut seen: HashSet<String> = HashSet::new();
    let mut ports = Vec::new();

    for port in records.into_iter().filter_map(LocationRecord::to_port) {
        if seen.insert(port.locode.clone()) {
            ports.push(port);
        }
    }

    ports
}

/// Runs a complete crawl and writes both artifacts
///
/// Artifacts are written only after every fetch has settled; a write failure
/// fails the run.
///
/// # Example
///
/// ```no_run
/// use unlocode_crawler::config::Config;
/// use unlocode_crawler::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let outcome = run_crawl(Config::default()).await?;
/// println!("{} countries", outcome.countries.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<CrawlOutcome, CrawlError> {
    let coordinator = Coordinator::new(config)?;
    let outcome = coordinator.crawl().await?;

    let output = &coordinator.config().output;
    write_index(&output.index_path(), &outcome.index)?;
    write_countries(&output.countries_path(), &outcome.countries)?;

    tracing::info!(
        "Wrote {} and {}",
        output.index_path().display(),
        output.countries_path().display()
    );

    Ok(outcome)
}
