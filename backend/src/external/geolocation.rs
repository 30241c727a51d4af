//! IP geolocation client
//!
//! Talks to an ip-api.com compatible service: `GET {base}/json/`.

use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::Location;

use super::{ensure_success, parse_error, transport_error};
use crate::error::{AppError, AppResult};

const SOURCE: &str = "geolocation";

/// Geolocation API client
#[derive(Clone)]
pub struct IpGeolocationClient {
    client: Client,
    base_url: String,
}

/// ip-api response; every field may be absent
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: Option<String>,
    message: Option<String>,
    lat: Option<Decimal>,
    lon: Option<Decimal>,
    city: Option<String>,
    #[serde(rename = "regionName")]
    region_name: Option<String>,
    country: Option<String>,
}

impl IpGeolocationClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Resolve the caller's location, reporting failures
    pub async fn lookup(&self) -> AppResult<Location> {
        let url = format!("{}/json/", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| transport_error(SOURCE, e))?;
        let response = ensure_success(SOURCE, response).await?;

        let data: IpApiResponse = response.json().await.map_err(|e| parse_error(SOURCE, e))?;

        if data.status.as_deref() == Some("fail") {
            return Err(AppError::DataSource {
                source_name: SOURCE,
                message: data.message.unwrap_or_else(|| "lookup failed".to_string()),
            });
        }

        Ok(Location {
            lat: data.lat,
            lon: data.lon,
            city: data.city,
            region: data.region_name,
            country: data.country,
            resolved: true,
        })
    }

    /// Resolve the caller's location; any failure yields [`Location::unresolved`]
    pub async fn locate(&self) -> Location {
        match self.lookup().await {
            Ok(location) => location,
            Err(e) => {
                tracing::warn!(source = SOURCE, error = %e, "Location lookup failed, continuing unresolved");
                Location::unresolved()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn client_for(server: &mockito::Server) -> IpGeolocationClient {
        let http = crate::external::build_http_client(Duration::from_secs(2)).unwrap();
        IpGeolocationClient::new(http, server.url())
    }

    #[tokio::test]
    async fn test_lookup_maps_provider_fields() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/json/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"status":"success","lat":18.5204,"lon":73.8567,"city":"Pune","regionName":"Maharashtra","country":"India"}"#,
            )
            .create_async()
            .await;

        let location = client_for(&server).locate().await;
        assert!(location.resolved);
        assert_eq!(location.lat, Some(Decimal::new(185204, 4)));
        assert_eq!(location.region.as_deref(), Some("Maharashtra"));
        assert_eq!(location.country.as_deref(), Some("India"));
    }

    #[tokio::test]
    async fn test_sparse_success_is_still_resolved() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/json/")
            .with_status(200)
            .with_body(r#"{"status":"success","country":"India"}"#)
            .create_async()
            .await;

        let location = client_for(&server).locate().await;
        assert!(location.resolved);
        assert!(location.coordinates().is_none());
        assert_eq!(location.city_or_unknown(), "Unknown");
    }

    #[tokio::test]
    async fn test_fail_status_is_unresolved() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/json/")
            .with_status(200)
            .with_body(r#"{"status":"fail","message":"reserved range"}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.lookup().await.unwrap_err();
        assert!(err.to_string().contains("reserved range"));
        assert_eq!(client.locate().await, Location::unresolved());
    }

    #[tokio::test]
    async fn test_server_error_is_unresolved() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/json/")
            .with_status(503)
            .create_async()
            .await;

        assert_eq!(client_for(&server).locate().await, Location::unresolved());
    }
}
