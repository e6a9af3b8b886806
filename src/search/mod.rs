//! Dataset search
//!
//! In-process implementation of the lookup the search service performs over
//! the countries artifact: case-insensitive substring matching over country
//! name/code and port name/LOCODE, with capped and ranked results.

use crate::model::Country;
use crate::CrawlError;
use serde::Serialize;
use std::path::Path;

/// Maximum countries returned by a query
pub const MAX_COUNTRY_HITS: usize = 10;

/// Maximum ports returned by a query
pub const MAX_PORT_HITS: usize = 200;

/// Countries and ports returned for an empty query
pub const BROWSE_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryHit {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortHit {
    pub locode: String,
    pub name: String,
    pub country_code: String,
    pub country_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    pub countries: Vec<CountryHit>,
    pub ports: Vec<PortHit>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryDetail {
    pub country: CountryHit,
    pub ports: Vec<PortHit>,
}

/// The loaded countries artifact
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    countries: Vec<Country>,
}

impl Dataset {
    pub fn new(countries: Vec<Country>) -> Self {
        Self { countries }
    }

    /// Loads the countries artifact written by the crawler
    pub fn load(path: &Path) -> Result<Self, CrawlError> {
        if !path.exists() {
            return Err(CrawlError::DatasetMissing {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        let countries: Vec<Country> = serde_json::from_str(&content)?;
        tracing::debug!("Loaded {} countries from {}", countries.len(), path.display());

        Ok(Self::new(countries))
    }

    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    /// Runs a query
    ///
    /// An empty (or blank) query browses the first entries in document order.
    /// Otherwise countries match on name or code and are ordered by name;
    /// ports match on their own name, their LOCODE or their country's name,
    /// with port-name matches ranked first, then country-name matches, then
    /// by port name.
    pub fn search(&self, query: &str) -> SearchResults {
        let query = query.trim();
        if query.is_empty() {
            return self.browse();
        }

        let needle = query.to_lowercase();
        let contains = |haystack: &str| haystack.to_lowercase().contains(&needle);

        let mut countries: Vec<CountryHit> = self
            .countries
            .iter()
            .filter(|c| contains(&c.name) || contains(&c.code))
            .map(country_hit)
            .collect();
        countries.sort_by(|a, b| a.name.cmp(&b.name));
        countries.truncate(MAX_COUNTRY_HITS);

        let mut ranked: Vec<(bool, bool, PortHit)> = self
            .port_hits()
            .filter_map(|hit| {
                let name_match = contains(&hit.name);
                let country_match = contains(&hit.country_name);
                (name_match || country_match || contains(&hit.locode))
                    .then_some((name_match, country_match, hit))
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.0.cmp(&a.0)
                .then_with(|| b.1.cmp(&a.1))
                .then_with(|| a.2.name.cmp(&b.2.name))
        });

        let ports = ranked
            .into_iter()
            .take(MAX_PORT_HITS)
            .map(|(_, _, hit)| hit)
            .collect();

        SearchResults { countries, ports }
    }

    /// Looks up one country by code (case-insensitive), ports sorted by name
    pub fn country_detail(&self, code: &str) -> Result<CountryDetail, CrawlError> {
        let code = code.trim().to_uppercase();
        if code.is_empty() {
            return Err(CrawlError::EmptyCountryCode);
        }

        let country = self
            .countries
            .iter()
            .find(|c| c.code.to_uppercase() == code)
            .ok_or_else(|| CrawlError::CountryNotFound(code.clone()))?;

        let mut ports: Vec<PortHit> = country
            .ports
            .iter()
            .map(|p| PortHit {
                locode: p.locode.clone(),
                name: p.name.clone(),
                country_code: country.code.clone(),
                country_name: country.name.clone(),
            })
            .collect();
        ports.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(CountryDetail {
            country: country_hit(country),
            ports,
        })
    }

    fn browse(&self) -> SearchResults {
        SearchResults {
            countries: self
                .countries
                .iter()
                .take(BROWSE_LIMIT)
                .map(country_hit)
                .collect(),
            ports: self.port_hits().take(BROWSE_LIMIT).collect(),
        }
    }

    fn port_hits(&self) -> impl Iterator<Item = PortHit> + '_ {
        self.countries.iter().flat_map(|country| {
            country.ports.iter().map(move |port| PortHit {
                locode: port.locode.clone(),
                name: port.name.clone(),
                country_code: country.code.clone(),
                country_name: country.name.clone(),
            })
        })
    }
}

fn country_hit(country: &Country) -> CountryHit {
    CountryHit {
        code: country.code.clone(),
        name: country.name.clone(),
    }
}
