//! LOCODE cell parsing
//!
//! The LOCODE column reads like `"DZ  AZR"` but spacing is inconsistent
//! across pages. A strict pattern is tried first; callers fall back to a plain
//! whitespace split only when it does not match.

use regex::Regex;
use std::sync::LazyLock;

static STRICT_LOCODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z]{2})\s+([A-Za-z0-9]{3})$")
        .unwrap_or_else(|e| panic!("invalid LOCODE pattern: {e}"))
});

/// Outcome of the strict LOCODE pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocodeParse {
    /// Two-letter country plus three-character location, uppercased
    Matched { country: String, location: String },
    Unmatched,
}

impl LocodeParse {
    /// Applies the strict pattern to a cleaned cell
    pub fn strict(cell: &str) -> Self {
        match STRICT_LOCODE.captures(cell.trim()) {
            Some(caps) => LocodeParse::Matched {
                country: caps[1].to_uppercase(),
                location: caps[2].to_uppercase(),
            },
            None => LocodeParse::Unmatched,
        }
    }

    /// Whitespace split: the first two non-empty tokens, uppercased
    pub fn split(cell: &str) -> Self {
        let mut parts = cell.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some(country), Some(location)) => LocodeParse::Matched {
                country: country.to_uppercase(),
                location: location.to_uppercase(),
            },
            _ => LocodeParse::Unmatched,
        }
    }
}

/// The code parts extracted from a LOCODE cell
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocodeParts {
    pub country_code: String,
    pub location_code: String,

    /// `country_code + location_code`, or the raw cell when either is missing
    pub combined: String,
}

/// Parses a cleaned LOCODE cell: strict pattern, then whitespace split
pub fn parse_locode(cell: &str) -> LocodeParts {
    let parsed = match LocodeParse::strict(cell) {
        LocodeParse::Unmatched => LocodeParse::split(cell),
        matched => matched,
    };

    match parsed {
        LocodeParse::Matched { country, location }
            if !country.is_empty() && !location.is_empty() =>
        {
            LocodeParts {
                combined: format!("{country}{location}"),
                country_code: country,
                location_code: location,
            }
        }
        _ => LocodeParts {
            combined: cell.to_string(),
            ..LocodeParts::default()
        },
    }
}
