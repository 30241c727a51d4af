//! External API integrations
//!
//! Context providers (geolocation, soil, weather) are fail-soft: their
//! `fetch`/`locate` methods never fail and fall back to defaults. The
//! completion client is the one provider whose failures surface.

pub mod completion;
pub mod geolocation;
pub mod soil;
pub mod weather;

use std::time::Duration;

use reqwest::{Client, Response};

use crate::error::{AppError, AppResult};

pub use completion::{ChatCompletionClient, CompletionOptions, CompletionService};
pub use geolocation::IpGeolocationClient;
pub use soil::SoilClient;
pub use weather::WeatherClient;

/// Build an HTTP client with an explicit request timeout
pub fn build_http_client(timeout: Duration) -> AppResult<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))
}

/// Turn a non-2xx data-source response into a `DataSource` error
async fn ensure_success(source_name: &'static str, response: Response) -> AppResult<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(AppError::DataSource {
        source_name,
        message: format!("API returned {}: {}", status, body),
    })
}

fn transport_error(source_name: &'static str, err: reqwest::Error) -> AppError {
    let message = if err.is_timeout() {
        "request timed out".to_string()
    } else {
        format!("Request failed: {}", err)
    };
    AppError::DataSource {
        source_name,
        message,
    }
}

fn parse_error(source_name: &'static str, err: reqwest::Error) -> AppError {
    AppError::DataSource {
        source_name,
        message: format!("Failed to parse response: {}", err),
    }
}
