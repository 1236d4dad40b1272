//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub log_level: Level,
    pub groq_api_key: String,
    pub groq_api_base: String,
    pub completion_model: String,
    /// Deadline for a single completion request. An unresponsive upstream fails
    /// the request instead of stalling it indefinitely.
    pub completion_timeout: Duration,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server and Database Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingVar("DATABASE_URL".to_string()))?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Load Completion Service Settings ---
        let groq_api_key = std::env::var("GROQ_API_KEY")
            .map_err(|_| ConfigError::MissingVar("GROQ_API_KEY".to_string()))?;
        let groq_api_base = std::env::var("GROQ_API_BASE")
            .unwrap_or_else(|_| "https://api.groq.com/openai/v1".to_string());
        let completion_model =
            std::env::var("COMPLETION_MODEL").unwrap_or_else(|_| "llama3-70b-8192".to_string());

        let timeout_secs_str =
            std::env::var("COMPLETION_TIMEOUT_SECS").unwrap_or_else(|_| "60".to_string());
        let timeout_secs = timeout_secs_str.parse::<u64>().map_err(|_| {
            ConfigError::InvalidValue(
                "COMPLETION_TIMEOUT_SECS".to_string(),
                format!("'{}' is not a number of seconds", timeout_secs_str),
            )
        })?;

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            groq_api_key,
            groq_api_base,
            completion_model,
            completion_timeout: Duration::from_secs(timeout_secs),
        })
    }
}
