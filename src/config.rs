//! Application configuration loaded from environment variables.
//!
//! One fixed Strava credential set: client id, client secret and the
//! long-lived refresh token. There is no per-user credential storage.

use std::env;
use std::path::PathBuf;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Strava OAuth client ID (public)
    pub strava_client_id: String,
    /// Strava OAuth client secret
    pub strava_client_secret: String,
    /// Long-lived refresh token for the single configured athlete
    pub strava_refresh_token: String,
    /// Server port
    pub port: u16,
    /// Path of the persisted activity dataset (JSON array)
    pub data_file: PathBuf,
    /// Path of the CSV export document
    pub export_file: PathBuf,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            strava_client_id: "test_client_id".to_string(),
            strava_client_secret: "test_secret".to_string(),
            strava_refresh_token: "test_refresh_token".to_string(),
            port: 5000,
            data_file: PathBuf::from("activities.json"),
            export_file: PathBuf::from("activities.csv"),
        }
    }
}

impl Config {
    /// Load configuration from environment variables (`.env` supported).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            strava_client_id: env::var("STRAVA_CLIENT_ID")
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_ID"))?,
            strava_client_secret: env::var("STRAVA_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_SECRET"))?,
            strava_refresh_token: env::var("STRAVA_REFRESH_TOKEN")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRAVA_REFRESH_TOKEN"))?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .unwrap_or(5000),
            data_file: env::var("DATA_FILE")
                .unwrap_or_else(|_| "activities.json".to_string())
                .into(),
            export_file: env::var("EXPORT_FILE")
                .unwrap_or_else(|_| "activities.csv".to_string())
                .into(),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
