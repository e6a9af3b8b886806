//! Country record fetcher
//!
//! Each country page carries one location table whose columns are, in order:
//! change marker, LOCODE, name, name without diacritics, subdivision,
//! function, status, date, IATA, coordinates and remarks.

use crate::crawler::fetcher::fetch_page;
use crate::geo::parse_coordinates;
use crate::html::{extract_table, TableMatcher, TableRow};
use crate::locode::parse_locode;
use crate::model::LocationRecord;
use crate::CrawlError;
use reqwest::Client;

/// Minimum number of cells in a location row
pub const LOCATION_COLUMNS: usize = 11;

const LOCATION_TABLE: &[TableMatcher<'static>] = &[
    TableMatcher::LinkedCellContains("Name"),
    TableMatcher::HeaderContains("Name"),
];

/// Fetches one country page and extracts its location records
pub async fn fetch_location_records(
    client: &Client,
    url: &str,
) -> Result<Vec<LocationRecord>, CrawlError> {
    let html = fetch_page(client, url).await?;
    let records = parse_location_records(&html);
    tracing::trace!("{} yielded {} location records", url, records.len());
    Ok(records)
}

/// Extracts location records from a country page, in document order
///
/// The first row of the table is the header. Rows with fewer than
/// [`LOCATION_COLUMNS`] cells, an empty LOCODE cell or an empty name are
/// skipped.
pub fn parse_location_records(html: &str) -> Vec<LocationRecord> {
    let table = extract_table(html, LOCATION_TABLE);

    table
        .body_rows_with_min_cells(LOCATION_COLUMNS)
        .filter_map(parse_row)
        .collect()
}

fn parse_row(row: &TableRow) -> Option<LocationRecord> {
    let locode_cell = row.text(1);
    let name = row.text(2);
    if locode_cell.is_empty() || name.is_empty() {
        return None;
    }

    let locode = parse_locode(locode_cell);

    Some(LocationRecord {
        change_marker: row.text(0).to_string(),
        country_code: locode.country_code,
        location_code: locode.location_code,
        combined_locode: locode.combined,
        name: name.to_string(),
        name_without_diacritics: row.text(3).to_string(),
        subdivision: row.text(4).to_string(),
        function_code: row.text(5).to_string(),
        status: row.text(6).to_string(),
        date_marker: row.text(7).to_string(),
        iata_code: row.text(8).to_string(),
        coordinates: parse_coordinates(row.text(9)),
        remarks: row.text(10).to_string(),
    })
}
