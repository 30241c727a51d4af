//! Common types used across the service

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// GPS coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GpsCoordinates {
    pub latitude: Decimal,
    pub longitude: Decimal,
}

impl GpsCoordinates {
    pub fn new(latitude: Decimal, longitude: Decimal) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether both components fall inside the WGS84 ranges
    pub fn is_valid(&self) -> bool {
        self.latitude >= Decimal::from(-90)
            && self.latitude <= Decimal::from(90)
            && self.longitude >= Decimal::from(-180)
            && self.longitude <= Decimal::from(180)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_in_range() {
        let delhi = GpsCoordinates::new(Decimal::new(28_6139, 4), Decimal::new(77_2090, 4));
        assert!(delhi.is_valid());

        let edge = GpsCoordinates::new(Decimal::from(-90), Decimal::from(180));
        assert!(edge.is_valid());
    }

    #[test]
    fn test_coordinates_out_of_range() {
        assert!(!GpsCoordinates::new(Decimal::from(91), Decimal::ZERO).is_valid());
        assert!(!GpsCoordinates::new(Decimal::ZERO, Decimal::from(-181)).is_valid());
    }
}
