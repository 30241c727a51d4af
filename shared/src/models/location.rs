//! Location models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::GpsCoordinates;

/// Placeholder rendered for location parts the provider did not supply
pub const UNKNOWN_PLACE: &str = "Unknown";

/// Where the farmer is, as far as the geolocation lookup (or the client) knows
///
/// Every data field is optional. `resolved` separates a failed lookup from a
/// lookup that succeeded but returned a sparse record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Location {
    pub lat: Option<Decimal>,
    pub lon: Option<Decimal>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    #[serde(default = "resolved_by_default")]
    pub resolved: bool,
}

// Client-supplied locations usually omit the flag.
fn resolved_by_default() -> bool {
    true
}

impl Location {
    /// Sentinel for a failed lookup
    pub fn unresolved() -> Self {
        Self {
            lat: None,
            lon: None,
            city: None,
            region: None,
            country: None,
            resolved: false,
        }
    }

    /// Coordinates, only when both latitude and longitude are known
    pub fn coordinates(&self) -> Option<GpsCoordinates> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(GpsCoordinates::new(lat, lon)),
            _ => None,
        }
    }

    /// True when the record carries no data at all
    pub fn is_empty(&self) -> bool {
        self.lat.is_none()
            && self.lon.is_none()
            && self.city.is_none()
            && self.region.is_none()
            && self.country.is_none()
    }

    pub fn city_or_unknown(&self) -> &str {
        self.city.as_deref().unwrap_or(UNKNOWN_PLACE)
    }

    pub fn region_or_unknown(&self) -> &str {
        self.region.as_deref().unwrap_or(UNKNOWN_PLACE)
    }

    pub fn country_or_unknown(&self) -> &str {
        self.country.as_deref().unwrap_or(UNKNOWN_PLACE)
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::unresolved()
    }
}
