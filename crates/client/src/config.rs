//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `EQORI_API_BASE_URL` - Backend API root (default: `http://localhost:8000/api`)
//! - `EQORI_DATA_DIR` - Directory for persisted credentials
//!   (default: the platform data directory, e.g. `~/.local/share/eqori`)

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Default backend root when `EQORI_API_BASE_URL` is unset, matching the
/// local development server.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

/// Application name used for the platform data directory.
const APP_DIR_NAME: &str = "eqori";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("No data directory available; set EQORI_DATA_DIR")]
    NoDataDir,
}

/// Client configuration.
///
/// Read once at process start; the base URL never changes for the lifetime
/// of the client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Root URL of the backend API. All request paths are joined to this.
    pub api_base_url: Url,
    /// Directory holding the persisted credential file.
    pub data_dir: PathBuf,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `EQORI_API_BASE_URL` is set but not a valid
    /// absolute URL, or if no data directory can be determined.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let raw_base = get_env_or_default("EQORI_API_BASE_URL", DEFAULT_API_BASE_URL);
        let api_base_url = parse_base_url(&raw_base)
            .map_err(|e| ConfigError::InvalidEnvVar("EQORI_API_BASE_URL".to_string(), e))?;

        let data_dir = match get_optional_env("EQORI_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_dir()
                .map(|d| d.join(APP_DIR_NAME))
                .ok_or(ConfigError::NoDataDir)?,
        };

        Ok(Self {
            api_base_url,
            data_dir,
        })
    }
}

/// Parse and sanity-check an API base URL.
///
/// A trailing slash is stripped so path joining behaves the same whether or
/// not the operator included one.
fn parse_base_url(raw: &str) -> Result<Url, String> {
    let trimmed = raw.trim_end_matches('/');
    let url = Url::parse(trimmed).map_err(|e| e.to_string())?;
    if url.cannot_be_a_base() {
        return Err("must be an absolute http(s) URL".to_string());
    }
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("unsupported scheme '{other}'")),
    }
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
