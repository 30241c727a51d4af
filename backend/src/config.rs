//! Configuration management for the Farm Advisory service
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with FARM_ prefix

use std::time::Duration;

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Chat-completion provider configuration
    pub completion: CompletionConfig,

    /// IP geolocation provider
    pub geolocation: DataSourceConfig,

    /// Soil properties provider
    pub soil: DataSourceConfig,

    /// Weather forecast provider
    pub weather: DataSourceConfig,

    /// Settings common to all context data sources
    pub data_sources: DataSourcesConfig,

    /// CORS configuration
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,

    /// Largest accepted request body (uploads included)
    pub max_body_bytes: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CompletionConfig {
    /// Bearer key for the provider
    pub api_key: String,

    /// Base URL of the OpenAI-compatible API (without `/chat/completions`)
    pub base_url: String,

    /// Model used for text-only use cases
    pub text_model: String,

    /// Model used for image-bearing use cases
    pub vision_model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataSourceConfig {
    /// Provider base URL
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataSourcesConfig {
    /// Per-request timeout in seconds; a timeout falls back to defaults
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CorsConfig {
    /// Allowed origins; empty means any origin
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("FARM_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 5002)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.max_body_bytes", 20 * 1024 * 1024)?
            .set_default("completion.base_url", "https://api.groq.com/openai/v1")?
            .set_default("completion.text_model", "llama-3.3-70b-versatile")?
            .set_default(
                "completion.vision_model",
                "meta-llama/llama-4-scout-17b-16e-instruct",
            )?
            .set_default("completion.timeout_secs", 60)?
            .set_default("geolocation.base_url", "http://ip-api.com")?
            .set_default("soil.base_url", "https://api.openepi.io")?
            .set_default("weather.base_url", "https://api.open-meteo.com/v1")?
            .set_default("data_sources.timeout_secs", 10)?
            .set_default("cors.allowed_origins", Vec::<String>::new())?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (FARM_ prefix)
            .add_source(
                Environment::with_prefix("FARM")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Timeout for geolocation, soil and weather calls
    pub fn data_source_timeout(&self) -> Duration {
        Duration::from_secs(self.data_sources.timeout_secs)
    }

    /// Timeout for the completion call
    pub fn completion_timeout(&self) -> Duration {
        Duration::from_secs(self.completion.timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5002,
            host: "0.0.0.0".to_string(),
            max_body_bytes: 20 * 1024 * 1024,
        }
    }
}
