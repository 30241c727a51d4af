//! Weather API client for fetching current conditions
//!
//! Integrates with the Open-Meteo forecast API: current temperature and wind
//! speed, plus the first hourly humidity and precipitation samples.

use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::{GpsCoordinates, WeatherReading};

use super::{ensure_success, parse_error, transport_error};
use crate::error::AppResult;

const SOURCE: &str = "weather";

/// Weather API client
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
}

/// Open-Meteo forecast response
#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: Option<CurrentWeather>,
    hourly: Option<HourlySeries>,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    temperature: Option<Decimal>,
    windspeed: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
struct HourlySeries {
    #[serde(default)]
    relativehumidity_2m: Vec<Option<Decimal>>,
    #[serde(default)]
    precipitation: Vec<Option<Decimal>>,
}

fn first_sample(series: &[Option<Decimal>]) -> Option<Decimal> {
    series.first().copied().flatten()
}

impl WeatherClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Fetch current conditions, reporting failures
    pub async fn fetch_current(&self, coords: GpsCoordinates) -> AppResult<WeatherReading> {
        let url = format!("{}/forecast", self.base_url);
        let query = [
            ("latitude", coords.latitude.to_string()),
            ("longitude", coords.longitude.to_string()),
            ("current_weather", "true".to_string()),
            ("hourly", "relativehumidity_2m,precipitation".to_string()),
        ];

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| transport_error(SOURCE, e))?;
        let response = ensure_success(SOURCE, response).await?;

        let data: ForecastResponse = response.json().await.map_err(|e| parse_error(SOURCE, e))?;

        let current = data.current_weather.as_ref();
        let hourly = data.hourly.as_ref();
        Ok(WeatherReading {
            temperature: current.and_then(|c| c.temperature),
            windspeed: current.and_then(|c| c.windspeed),
            humidity: hourly.and_then(|h| first_sample(&h.relativehumidity_2m)),
            precipitation: hourly.and_then(|h| first_sample(&h.precipitation)),
        })
    }

    /// Fetch current conditions; any failure yields an empty reading
    pub async fn fetch(&self, coords: Option<GpsCoordinates>) -> WeatherReading {
        let Some(coords) = coords else {
            tracing::warn!(source = SOURCE, "No coordinates for weather lookup, using defaults");
            return WeatherReading::default();
        };

        match self.fetch_current(coords).await {
            Ok(reading) => reading,
            Err(e) => {
                tracing::warn!(source = SOURCE, error = %e, "Weather lookup failed, using defaults");
                WeatherReading::default()
            }
        }
    }
}
