//! Weather data models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Default air temperature, °C
pub const DEFAULT_TEMPERATURE: Decimal = Decimal::from_parts(30, 0, 0, false, 0);
/// Default relative humidity, percent
pub const DEFAULT_HUMIDITY: Decimal = Decimal::from_parts(50, 0, 0, false, 0);
/// Default precipitation, mm
pub const DEFAULT_PRECIPITATION: Decimal = Decimal::from_parts(0, 0, 0, false, 0);
/// Default wind speed, km/h
pub const DEFAULT_WINDSPEED: Decimal = Decimal::from_parts(10, 0, 0, false, 0);

/// Partial weather record as returned by the forecast provider
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WeatherReading {
    pub temperature: Option<Decimal>,
    pub humidity: Option<Decimal>,
    pub precipitation: Option<Decimal>,
    pub windspeed: Option<Decimal>,
}

impl WeatherReading {
    /// Fill every missing value with its default
    pub fn with_defaults(self) -> WeatherSnapshot {
        WeatherSnapshot {
            temperature: self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            humidity: self.humidity.unwrap_or(DEFAULT_HUMIDITY),
            precipitation: self.precipitation.unwrap_or(DEFAULT_PRECIPITATION),
            windspeed: self.windspeed.unwrap_or(DEFAULT_WINDSPEED),
        }
    }
}

/// Current conditions at the farm, every value present
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherSnapshot {
    pub temperature: Decimal,
    pub humidity: Decimal,
    pub precipitation: Decimal,
    pub windspeed: Decimal,
}

impl Default for WeatherSnapshot {
    fn default() -> Self {
        WeatherReading::default().with_defaults()
    }
}
