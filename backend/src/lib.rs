//! Farm Advisory service
//!
//! Answers farmer questions (government schemes, crop disease photos,
//! document explanations, fertilizer plans, post-harvest handling) by
//! enriching a prompt with location, soil and weather data and sending it to
//! a chat-completion provider.

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, http::HeaderValue, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod routes;
pub mod services;

pub use config::Config;
pub use error::{AppError, AppResult};

use services::AdvisoryService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub advisory: Arc<AdvisoryService>,
}

impl AppState {
    pub fn new(config: Config, advisory: AdvisoryService) -> Self {
        Self {
            config: Arc::new(config),
            advisory: Arc::new(advisory),
        }
    }

    /// State backed by the configured production providers
    pub fn from_config(config: Config) -> AppResult<Self> {
        let advisory = AdvisoryService::from_config(&config)?;
        Ok(Self::new(config, advisory))
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors.allowed_origins);
    let body_limit = DefaultBodyLimit::max(state.config.server.max_body_bytes);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .merge(routes::advisory_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors)
                .layer(body_limit),
        )
        .with_state(state)
}

/// CORS configuration; no configured origins means any origin
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}
