//! Application configuration loaded from environment variables.
//!
//! The host application loads this once at startup and hands it to
//! [`crate::SessionContext::new`].

use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the backend REST API (no trailing slash).
    pub api_base_url: String,
    /// Directory for local persistence (tokens, metrics snapshot).
    pub storage_dir: PathBuf,
    /// Google OAuth client ID used by the federated login flow (public).
    pub google_client_id: String,
    /// Per-request timeout for backend calls.
    pub request_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Reads a `.env` file if present. Only `FITTRACK_GOOGLE_CLIENT_ID` is
    /// required; everything else has a local-development default.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            api_base_url: env::var("FITTRACK_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            storage_dir: env::var("FITTRACK_STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".fittrack")),
            google_client_id: env::var("FITTRACK_GOOGLE_CLIENT_ID")
                .map_err(|_| ConfigError::Missing("FITTRACK_GOOGLE_CLIENT_ID"))?,
            request_timeout: env::var("FITTRACK_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)),
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api".to_string(),
            storage_dir: PathBuf::from(".fittrack-test"),
            google_client_id: "test-google-client-id".to_string(),
            request_timeout: Duration::from_secs(5),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
