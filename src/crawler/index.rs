//! Country index fetcher
//!
//! The index page lists one row per country: the ISO code in the first cell
//! and, in the second, the country name followed by bracketed links to its
//! alphabetical segments (`Singapore [A to E] [F to Z]`).

use crate::crawler::fetcher::fetch_page;
use crate::html::{extract_table, TableMatcher};
use crate::model::CountryIndexEntry;
use crate::CrawlError;
use reqwest::Client;
use url::Url;

const INDEX_TABLE: &[TableMatcher<'static>] = &[TableMatcher::HeaderContains("ISO 3166-1")];

/// Fetches and parses the country index
///
/// The index is mandatory: a failed fetch or a page yielding no countries
/// aborts the crawl.
pub async fn fetch_country_index(
    client: &Client,
    index_url: &str,
) -> Result<Vec<CountryIndexEntry>, CrawlError> {
    let base_url = Url::parse(index_url)?;
    let html = fetch_page(client, index_url).await?;

    let entries = parse_country_index(&html, &base_url);
    if entries.is_empty() {
        return Err(CrawlError::EmptyIndex {
            url: index_url.to_string(),
        });
    }

    tracing::info!(
        "Country index lists {} countries with {} detail links",
        entries.len(),
        entries.iter().map(|e| e.detail_links.len()).sum::<usize>()
    );

    Ok(entries)
}

/// Extracts the index entries from the page HTML, in document order
///
/// Rows with fewer than two cells, an empty code or an empty name are dropped.
pub fn parse_country_index(html: &str, base_url: &Url) -> Vec<CountryIndexEntry> {
    let table = extract_table(html, INDEX_TABLE);

    table
        .rows_with_min_cells(2)
        .filter_map(|row| {
            let country_code = row.text(0).to_string();
            let display_name = strip_segment_links(row.text(1));
            if country_code.is_empty() || display_name.is_empty() {
                return None;
            }

            let mut detail_links: Vec<String> = Vec::new();
            for href in row.cell(1).map(|c| c.links.as_slice()).unwrap_or_default() {
                if let Ok(absolute) = base_url.join(href) {
                    let absolute = absolute.to_string();
                    if !detail_links.contains(&absolute) {
                        detail_links.push(absolute);
                    }
                }
            }

            Some(CountryIndexEntry {
                country_code,
                display_name,
                detail_links,
            })
        })
        .collect()
}

/// Drops everything from the first `[` onward
fn strip_segment_links(name: &str) -> String {
    match name.find('[') {
        Some(pos) => name[..pos].trim().to_string(),
        None => name.trim().to_string(),
    }
}
