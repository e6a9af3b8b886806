//! Coordinate normalization
//!
//! UN/LOCODE publishes positions as degrees/minutes/hemisphere tokens such as
//! `3550N 00019W`. They are converted to decimal degrees rounded to two
//! places, the practical precision of the source data.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static DM_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{2})([0-9]{2})([NSns])\s*([0-9]{3})([0-9]{2})([EWew])$")
        .unwrap_or_else(|e| panic!("invalid coordinate pattern: {e}"))
});

/// A decimal-degree position
///
/// Serialized as a GeoJSON-ordered `[longitude, latitude]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

impl From<[f64; 2]> for Coordinates {
    fn from([longitude, latitude]: [f64; 2]) -> Self {
        Self {
            longitude,
            latitude,
        }
    }
}

impl From<Coordinates> for [f64; 2] {
    fn from(c: Coordinates) -> Self {
        [c.longitude, c.latitude]
    }
}

/// Parses a `DDMMH DDDMMH` token into decimal degrees
///
/// Hemisphere letters are case-insensitive and the space between the two
/// halves is optional. Anything else, including an empty token, yields `None`:
/// missing coordinates are common in the source and are not an error.
///
/// # Example
///
/// ```
/// use unlocode_crawler::geo::parse_coordinates;
///
/// let c = parse_coordinates("3550N 00019W").unwrap();
/// assert_eq!((c.longitude, c.latitude), (-0.32, 35.83));
/// assert!(parse_coordinates("").is_none());
/// ```
pub fn parse_coordinates(token: &str) -> Option<Coordinates> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }

    let caps = DM_PATTERN.captures(token)?;
    let number = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<f64>().ok());
    let southern = caps.get(3)?.as_str().eq_ignore_ascii_case("S");
    let western = caps.get(6)?.as_str().eq_ignore_ascii_case("W");

    let latitude = signed(number(1)? + number(2)? / 60.0, southern);
    let longitude = signed(number(4)? + number(5)? / 60.0, western);

    Some(Coordinates {
        longitude: round2(longitude),
        latitude: round2(latitude),
    })
}

fn signed(value: f64, negative: bool) -> f64 {
    if negative {
        -value
    } else {
        value
    }
}

/// Rounds to two decimals, halves toward positive infinity
fn round2(value: f64) -> f64 {
    let rounded = (value * 100.0 + 0.5).floor() / 100.0;
    // avoid emitting -0.0
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}
