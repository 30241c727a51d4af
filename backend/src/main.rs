//! Farm Advisory Service - Backend Server
//!
//! AI advisory endpoints for farmers: government schemes, plant disease
//! diagnosis, document explanation, fertilizer and post-harvest planning.

use std::net::SocketAddr;

use farm_advisory::{create_app, AppState, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "farm_advisory=debug,farm_advisory_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Farm Advisory Server");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!(
        text_model = %config.completion.text_model,
        vision_model = %config.completion.vision_model,
        "Completion provider: {}",
        config.completion.base_url
    );

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    // Create application state
    let state = AppState::from_config(config)?;

    // Build application
    let app = create_app(state);

    // Start server
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
