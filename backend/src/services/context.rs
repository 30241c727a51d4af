//! Context aggregation
//!
//! Merges the subject with location, soil and weather data into one
//! [`AdvisoryContext`]. Data sources are fail-soft, so aggregation only
//! fails on invalid client input.

use chrono::Utc;
use shared::{
    validate_coordinates, AdvisoryContext, FarmData, GpsCoordinates, Location, SoilReading,
    Subject, WeatherReading,
};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::external::{build_http_client, IpGeolocationClient, SoilClient, WeatherClient};

/// Client-supplied context that replaces a lookup
#[derive(Debug, Clone, Default)]
pub struct ContextOverrides {
    pub location: Option<Location>,
    pub soil: Option<SoilReading>,
}

/// Builds advisory contexts from the configured data sources
#[derive(Clone)]
pub struct ContextAggregator {
    geolocation: IpGeolocationClient,
    soil: SoilClient,
    weather: WeatherClient,
}

impl ContextAggregator {
    pub fn new(geolocation: IpGeolocationClient, soil: SoilClient, weather: WeatherClient) -> Self {
        Self {
            geolocation,
            soil,
            weather,
        }
    }

    /// Build all three data-source clients from configuration
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let http = build_http_client(config.data_source_timeout())?;

        Ok(Self::new(
            IpGeolocationClient::new(http.clone(), config.geolocation.base_url.as_str()),
            SoilClient::new(http.clone(), config.soil.base_url.as_str()),
            WeatherClient::new(http, config.weather.base_url.as_str()),
        ))
    }

    /// Assemble the context for `subject`
    ///
    /// Only the context the use case needs is fetched. Location comes
    /// first; soil and weather then run concurrently on its coordinates.
    pub async fn aggregate(
        &self,
        subject: Subject,
        overrides: ContextOverrides,
    ) -> AppResult<AdvisoryContext> {
        subject.validate().map_err(AppError::validation)?;

        let ContextOverrides {
            location: location_override,
            soil: soil_override,
        } = overrides;

        let use_case = subject.use_case();
        let needs = use_case.context_needs();
        let fetch_soil = needs.soil && soil_override.is_none();
        let fetch_weather = needs.weather;

        let client_location = location_override.is_some();
        let location = match location_override {
            Some(location) => location,
            None if needs.location || fetch_soil || fetch_weather => self.geolocation.locate().await,
            None => Location::unresolved(),
        };

        let coords = if fetch_soil || fetch_weather {
            lookup_coordinates(&location, client_location)?
        } else {
            None
        };

        let (soil, weather) = tokio::join!(
            async {
                match soil_override {
                    Some(reading) => reading,
                    None if fetch_soil => self.soil.fetch(coords).await,
                    None => SoilReading::default(),
                }
            },
            async {
                if fetch_weather {
                    self.weather.fetch(coords).await
                } else {
                    WeatherReading::default()
                }
            }
        );

        tracing::debug!(
            use_case = %use_case,
            resolved = location.resolved,
            soil_fields = !soil.is_empty(),
            "Context aggregated"
        );

        Ok(AdvisoryContext::new(
            subject,
            location,
            soil.with_defaults(),
            weather.with_defaults(),
            Utc::now(),
        ))
    }

    /// Location and soil for the caller, without a completion
    pub async fn farm_snapshot(&self) -> FarmData {
        let location = self.geolocation.locate().await;
        let soil = self.soil.fetch(location.coordinates()).await;

        FarmData {
            location,
            soil_data: soil.with_defaults(),
        }
    }
}

/// Coordinates for soil/weather lookups
///
/// A client-supplied resolved location must carry usable coordinates. A
/// looked-up one, or the unresolved placeholder echoed back by the client,
/// may not, and the fetchers then fall back to defaults.
fn lookup_coordinates(location: &Location, client_supplied: bool) -> AppResult<Option<GpsCoordinates>> {
    if client_supplied && location.resolved {
        return validate_coordinates(location.lat, location.lon)
            .map(Some)
            .map_err(AppError::validation);
    }
    Ok(location.coordinates())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use rust_decimal::Decimal;
    use shared::{SoilProfile, WeatherSnapshot, MSG_COORDINATES_MISSING, MSG_QUERY_MISSING};
    use std::time::Duration;

    fn aggregator_for(server: &mockito::Server) -> ContextAggregator {
        let http = build_http_client(Duration::from_secs(2)).unwrap();
        ContextAggregator::new(
            IpGeolocationClient::new(http.clone(), server.url()),
            SoilClient::new(http.clone(), server.url()),
            WeatherClient::new(http, server.url()),
        )
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn client_location() -> Location {
        Location {
            lat: Some(dec("18.52")),
            lon: Some(dec("73.85")),
            city: Some("Pune".into()),
            region: None,
            country: Some("India".into()),
            resolved: true,
        }
    }

    #[tokio::test]
    async fn test_invalid_subject_makes_no_calls() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let err = aggregator_for(&server)
            .aggregate(
                Subject::SchemeQuery { query: "   ".into() },
                ContextOverrides::default(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.client_message(), MSG_QUERY_MISSING);
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_context_free_use_case_skips_lookups() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let context = aggregator_for(&server)
            .aggregate(
                Subject::post_harvest("maize".into(), "2024-10-01".into(), Some("Karnataka".into())),
                ContextOverrides::default(),
            )
            .await
            .unwrap();
        assert!(!context.location().resolved);
        assert_eq!(context.soil(), &SoilProfile::default());
        assert_eq!(context.weather(), &WeatherSnapshot::default());
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_client_overrides_skip_location_and_soil_lookups() {
        let mut server = mockito::Server::new_async().await;
        let geo = server
            .mock("GET", "/json/")
            .expect(0)
            .create_async()
            .await;
        let soil = server
            .mock("GET", "/soil/property")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;
        let weather = server
            .mock("GET", "/forecast")
            .match_query(Matcher::UrlEncoded("latitude".into(), "18.52".into()))
            .with_status(200)
            .with_body(r#"{"current_weather":{"temperature":24.0,"windspeed":3.5},"hourly":{"relativehumidity_2m":[64],"precipitation":[1.2]}}"#)
            .create_async()
            .await;

        let overrides = ContextOverrides {
            location: Some(client_location()),
            soil: Some(SoilReading {
                soil_ph: Some(dec("7.9")),
                ..Default::default()
            }),
        };
        let context = aggregator_for(&server)
            .aggregate(Subject::Fertilizer { crop: "sugarcane".into() }, overrides)
            .await
            .unwrap();

        assert_eq!(context.location().city.as_deref(), Some("Pune"));
        assert_eq!(context.soil().soil_ph, dec("7.9"));
        assert_eq!(context.soil().soil_clay, shared::DEFAULT_SOIL_CLAY);
        assert_eq!(context.weather().temperature, dec("24.0"));
        assert_eq!(context.weather().humidity, dec("64"));
        geo.assert_async().await;
        soil.assert_async().await;
        weather.assert_async().await;
    }

    #[tokio::test]
    async fn test_client_location_without_coordinates_is_rejected() {
        let server = mockito::Server::new_async().await;

        let overrides = ContextOverrides {
            location: Some(Location {
                lat: None,
                lon: None,
                ..client_location()
            }),
            soil: Some(SoilReading::default()),
        };
        let err = aggregator_for(&server)
            .aggregate(Subject::Fertilizer { crop: "rice".into() }, overrides)
            .await
            .unwrap_err();
        assert_eq!(err.client_message(), MSG_COORDINATES_MISSING);
    }

    #[tokio::test]
    async fn test_unresolved_client_location_uses_default_weather() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let overrides = ContextOverrides {
            location: Some(Location::unresolved()),
            soil: Some(SoilReading {
                soil_ph: Some(shared::DEFAULT_SOIL_PH),
                ..Default::default()
            }),
        };
        let context = aggregator_for(&server)
            .aggregate(Subject::Fertilizer { crop: "rice".into() }, overrides)
            .await
            .unwrap();
        assert!(!context.location().resolved);
        assert_eq!(context.soil(), &SoilProfile::default());
        assert_eq!(context.weather(), &WeatherSnapshot::default());
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_failed_lookups_fall_back_to_defaults() {
        let mut server = mockito::Server::new_async().await;
        let _geo = server
            .mock("GET", "/json/")
            .with_status(500)
            .create_async()
            .await;

        let context = aggregator_for(&server)
            .aggregate(Subject::Fertilizer { crop: "rice".into() }, ContextOverrides::default())
            .await
            .unwrap();
        assert!(!context.location().resolved);
        assert_eq!(context.soil(), &SoilProfile::default());
        assert_eq!(context.weather(), &WeatherSnapshot::default());
    }

    #[tokio::test]
    async fn test_farm_snapshot_uses_located_coordinates() {
        let mut server = mockito::Server::new_async().await;
        let _geo = server
            .mock("GET", "/json/")
            .with_status(200)
            .with_body(r#"{"status":"success","lat":12.97,"lon":77.59,"city":"Bengaluru","regionName":"Karnataka","country":"India"}"#)
            .create_async()
            .await;
        let _topsoil = server
            .mock("GET", "/soil/property")
            .match_query(Matcher::AllOf(vec![
                Matcher::Regex("lat=12.97".into()),
                Matcher::Regex("properties=phh2o".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"properties":[{"property":"phh2o","depth_0_5":{"mean":6.1}}]}"#)
            .create_async()
            .await;
        let _stock = server
            .mock("GET", "/soil/property")
            .match_query(Matcher::Regex("properties=ocs".into()))
            .with_status(200)
            .with_body(r#"{"properties":[]}"#)
            .create_async()
            .await;

        let farm = aggregator_for(&server).farm_snapshot().await;
        assert_eq!(farm.location.region.as_deref(), Some("Karnataka"));
        assert_eq!(farm.soil_data.soil_ph, dec("6.1"));
        assert_eq!(
            farm.soil_data.soil_organic_carbon_stock,
            shared::DEFAULT_SOIL_ORGANIC_CARBON_STOCK
        );
    }
}
