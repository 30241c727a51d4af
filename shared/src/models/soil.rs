//! Soil models
//!
//! A [`SoilReading`] is whatever the soil provider (or the client) managed to
//! supply. [`SoilReading::with_defaults`] turns it into a [`SoilProfile`] by
//! filling each missing core property from the table below, one field at a
//! time.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Default soil pH
pub const DEFAULT_SOIL_PH: Decimal = Decimal::from_parts(65, 0, 0, false, 1);
/// Default organic carbon, percent
pub const DEFAULT_SOIL_ORGANIC_CARBON: Decimal = Decimal::from_parts(12, 0, 0, false, 1);
/// Default total nitrogen, percent
pub const DEFAULT_SOIL_NITROGEN: Decimal = Decimal::from_parts(1, 0, 0, false, 1);
/// Default clay content, percent
pub const DEFAULT_SOIL_CLAY: Decimal = Decimal::from_parts(200, 0, 0, false, 1);
/// Default organic carbon stock, Mg/ha
pub const DEFAULT_SOIL_ORGANIC_CARBON_STOCK: Decimal = Decimal::from_parts(500, 0, 0, false, 1);

/// Partial soil record, every property independently nullable
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SoilReading {
    pub soil_ph: Option<Decimal>,
    pub soil_organic_carbon: Option<Decimal>,
    pub soil_nitrogen: Option<Decimal>,
    pub soil_clay: Option<Decimal>,
    pub soil_organic_carbon_stock: Option<Decimal>,
    pub soil_phosphorus: Option<Decimal>,
    pub soil_potassium: Option<Decimal>,
}

impl SoilReading {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Fill every missing core property with its default
    pub fn with_defaults(self) -> SoilProfile {
        SoilProfile {
            soil_ph: self.soil_ph.unwrap_or(DEFAULT_SOIL_PH),
            soil_organic_carbon: self.soil_organic_carbon.unwrap_or(DEFAULT_SOIL_ORGANIC_CARBON),
            soil_nitrogen: self.soil_nitrogen.unwrap_or(DEFAULT_SOIL_NITROGEN),
            soil_clay: self.soil_clay.unwrap_or(DEFAULT_SOIL_CLAY),
            soil_organic_carbon_stock: self
                .soil_organic_carbon_stock
                .unwrap_or(DEFAULT_SOIL_ORGANIC_CARBON_STOCK),
            soil_phosphorus: self.soil_phosphorus,
            soil_potassium: self.soil_potassium,
        }
    }
}

/// Soil profile ready for prompt rendering
///
/// Phosphorus and potassium have no documented default and stay optional.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SoilProfile {
    pub soil_ph: Decimal,
    pub soil_organic_carbon: Decimal,
    pub soil_nitrogen: Decimal,
    pub soil_clay: Decimal,
    pub soil_organic_carbon_stock: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soil_phosphorus: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soil_potassium: Option<Decimal>,
}

impl Default for SoilProfile {
    fn default() -> Self {
        SoilReading::default().with_defaults()
    }
}
