//! Dataset entities
//!
//! All entities are plain values built bottom-up by the crawler; the JSON
//! shapes here are the contract with the search service.

use crate::geo::Coordinates;
use serde::{Deserialize, Serialize};

/// One row of the country index page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryIndexEntry {
    /// ISO 3166-1 alpha-2 code
    pub country_code: String,

    /// Country name with the bracketed segment links stripped
    pub display_name: String,

    /// Absolute URLs of the country's location pages, deduplicated, in document order
    pub detail_links: Vec<String>,
}

/// One row of a country's location table
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LocationRecord {
    pub change_marker: String,
    pub country_code: String,
    pub location_code: String,
    pub combined_locode: String,
    pub name: String,
    pub name_without_diacritics: String,
    pub subdivision: String,
    pub function_code: String,
    pub status: String,
    pub date_marker: String,
    pub iata_code: String,
    pub coordinates: Option<Coordinates>,
    pub remarks: String,
}

impl LocationRecord {
    /// Name used for the port: the diacritic-free form when present
    pub fn port_name(&self) -> &str {
        if self.name_without_diacritics.is_empty() {
            &self.name
        } else {
            &self.name_without_diacritics
        }
    }

    /// Reduces the record to a port, or `None` if it lacks a code or a name
    pub fn to_port(&self) -> Option<Port> {
        let name = self.port_name();
        if self.combined_locode.is_empty() || name.is_empty() {
            return None;
        }

        Some(Port {
            locode: self.combined_locode.clone(),
            name: name.to_string(),
            coordinates: self.coordinates,
        })
    }
}

/// A location as published in the final dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    pub locode: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

/// Top-level dataset entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub ports: Vec<Port>,
}
