//! Crawl statistics
//!
//! Counters gathered while the coordinator drains the fetch pool, finished
//! once the countries are assembled.

use crate::model::Country;
use chrono::{DateTime, Utc};

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Detail links fetched, successfully or not
    pub links_attempted: usize,

    /// Detail links that failed and contributed no records
    pub links_failed: usize,

    /// Location records extracted before deduplication
    pub records_extracted: usize,

    pub countries: usize,
    pub ports: usize,

    /// Countries emitted with an empty port list
    pub countries_without_ports: usize,
}

impl CrawlStatistics {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            finished_at: None,
            links_attempted: 0,
            links_failed: 0,
            records_extracted: 0,
            countries: 0,
            ports: 0,
            countries_without_ports: 0,
        }
    }

    /// Records the final dataset totals and the finish time
    pub fn finish(&mut self, countries: &[Country]) {
        self.countries = countries.len();
        self.ports = countries.iter().map(|c| c.ports.len()).sum();
        self.countries_without_ports = countries.iter().filter(|c| c.ports.is_empty()).count();
        self.finished_at = Some(Utc::now());
    }

    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Run:");
    println!("  Started: {}", stats.started_at.to_rfc3339());
    if let Some(finished) = stats.finished_at {
        println!("  Finished: {}", finished.to_rfc3339());
    }
    if let Some(seconds) = stats.duration_seconds() {
        println!("  Duration: {}s", seconds);
    }
    println!();

    println!("Detail Links:");
    println!("  Attempted: {}", stats.links_attempted);
    println!("  Failed: {}", stats.links_failed);
    println!("  Records extracted: {}", stats.records_extracted);
    println!();

    println!("Dataset:");
    println!("  Countries: {}", stats.countries);
    println!("  Ports: {}", stats.ports);
    println!("  Countries without ports: {}", stats.countries_without_ports);
    println!();

    let success_rate = if stats.links_attempted > 0 {
        ((stats.links_attempted - stats.links_failed) as f64 / stats.links_attempted as f64)
            * 100.0
    } else {
        0.0
    };

    println!(
        "Success Rate: {:.1}% ({} / {} links fetched)",
        success_rate,
        stats.links_attempted - stats.links_failed,
        stats.links_attempted
    );
}
