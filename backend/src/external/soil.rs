//! Soil properties client
//!
//! Queries an OpenEPI-style `GET {base}/soil/property` endpoint. Topsoil
//! properties come from the 0-5cm band; organic carbon stock is only
//! published for 0-30cm and needs its own request.

use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::{GpsCoordinates, SoilReading};

use super::{ensure_success, parse_error, transport_error};
use crate::error::AppResult;

const SOURCE: &str = "soil";

/// Properties requested in the topsoil query
const TOPSOIL_PROPERTIES: [&str; 4] = ["phh2o", "nitrogen", "soc", "clay"];

/// Soil API client
#[derive(Clone)]
pub struct SoilClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SoilPropertyResponse {
    #[serde(default)]
    properties: Vec<SoilProperty>,
}

#[derive(Debug, Deserialize)]
struct SoilProperty {
    property: String,
    depth_0_5: Option<DepthValues>,
    depth_0_30: Option<DepthValues>,
}

#[derive(Debug, Deserialize)]
struct DepthValues {
    mean: Option<Decimal>,
}

fn depth_mean(depth: &Option<DepthValues>) -> Option<Decimal> {
    depth.as_ref().and_then(|d| d.mean)
}

impl SoilClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Topsoil pH, nitrogen, organic carbon and clay
    pub async fn fetch_topsoil(&self, coords: GpsCoordinates) -> AppResult<SoilReading> {
        let mut query = vec![
            ("lat", coords.latitude.to_string()),
            ("lon", coords.longitude.to_string()),
            ("depths", "0-5cm".to_string()),
            ("depths", "0-30cm".to_string()),
        ];
        for property in TOPSOIL_PROPERTIES {
            query.push(("properties", property.to_string()));
        }
        query.push(("values", "mean".to_string()));

        let data = self.query(&query).await?;

        let mut reading = SoilReading::default();
        for prop in &data.properties {
            let mean = depth_mean(&prop.depth_0_5);
            match prop.property.as_str() {
                "phh2o" => reading.soil_ph = mean,
                "nitrogen" => reading.soil_nitrogen = mean,
                "soc" => reading.soil_organic_carbon = mean,
                "clay" => reading.soil_clay = mean,
                other => tracing::debug!(property = other, "Ignoring unrequested soil property"),
            }
        }
        Ok(reading)
    }

    /// Organic carbon stock over 0-30cm
    pub async fn fetch_carbon_stock(&self, coords: GpsCoordinates) -> AppResult<Option<Decimal>> {
        let query = [
            ("lat", coords.latitude.to_string()),
            ("lon", coords.longitude.to_string()),
            ("depths", "0-30cm".to_string()),
            ("properties", "ocs".to_string()),
            ("values", "mean".to_string()),
        ];

        let data = self.query(&query).await?;
        Ok(data
            .properties
            .iter()
            .find(|p| p.property == "ocs")
            .and_then(|p| depth_mean(&p.depth_0_30)))
    }

    /// Fetch a partial soil reading; failures leave the affected fields empty
    ///
    /// The two requests run concurrently and fail independently.
    pub async fn fetch(&self, coords: Option<GpsCoordinates>) -> SoilReading {
        let Some(coords) = coords else {
            tracing::warn!(source = SOURCE, "No coordinates for soil lookup, using defaults");
            return SoilReading::default();
        };

        let (topsoil, stock) = tokio::join!(self.fetch_topsoil(coords), self.fetch_carbon_stock(coords));

        let mut reading = topsoil.unwrap_or_else(|e| {
            tracing::warn!(source = SOURCE, error = %e, "Topsoil lookup failed, using defaults");
            SoilReading::default()
        });
        reading.soil_organic_carbon_stock = stock.unwrap_or_else(|e| {
            tracing::warn!(source = SOURCE, error = %e, "Carbon stock lookup failed, using default");
            None
        });
        reading
    }

    async fn query(&self, query: &[(&str, String)]) -> AppResult<SoilPropertyResponse> {
        let url = format!("{}/soil/property", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| transport_error(SOURCE, e))?;
        let response = ensure_success(SOURCE, response).await?;

        response.json().await.map_err(|e| parse_error(SOURCE, e))
    }
}
