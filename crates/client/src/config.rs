//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `SHOPVELY_API_BASE_URL` - REST API base, including the `/api` prefix
//!   (default: `http://localhost:8000/api`)
//! - `SHOPVELY_SESSION_FILE` - Where the auth session is persisted
//!   (default: `$HOME/.shopvely/session.json`)
//! - `SHOPVELY_USER_AGENT` - User-Agent header sent with every request
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Default REST API base URL.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

/// Session file location relative to the home directory.
const SESSION_FILE_RELATIVE: &str = ".shopvely/session.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL without a trailing slash (e.g. `http://localhost:8000/api`)
    pub api_base_url: String,
    /// Path of the persisted session file
    pub session_file: PathBuf,
    /// User-Agent header value
    pub user_agent: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the base URL is not an
    /// absolute http(s) URL.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_base_url = normalize_base_url(
            "SHOPVELY_API_BASE_URL",
            &lookup("SHOPVELY_API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
        )?;

        let session_file = lookup("SHOPVELY_SESSION_FILE")
            .filter(|v| !v.trim().is_empty())
            .map_or_else(|| default_session_file(lookup("HOME")), PathBuf::from);

        let user_agent = lookup("SHOPVELY_USER_AGENT")
            .unwrap_or_else(|| format!("Shopvely/{}", env!("CARGO_PKG_VERSION")));

        let sentry_dsn = lookup("SENTRY_DSN").filter(|v| !v.trim().is_empty());

        Ok(Self {
            api_base_url,
            session_file,
            user_agent,
            sentry_dsn,
        })
    }

    /// Configuration pointing at a specific API, with an explicit session file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `api_base_url` is not a valid
    /// http(s) URL.
    pub fn for_api(
        api_base_url: &str,
        session_file: impl Into<PathBuf>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base_url: normalize_base_url("api_base_url", api_base_url)?,
            session_file: session_file.into(),
            user_agent: format!("Shopvely/{}", env!("CARGO_PKG_VERSION")),
            sentry_dsn: None,
        })
    }

    /// Same configuration against a different API.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `api_base_url` is not a valid
    /// http(s) URL.
    pub fn with_api_base_url(self, api_base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base_url: normalize_base_url("api_base_url", api_base_url)?,
            ..self
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Validate the base URL and strip trailing slashes so paths can be appended.
fn normalize_base_url(var_name: &str, raw: &str) -> Result<String, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}

/// `$HOME/.shopvely/session.json`, or relative to the working directory.
fn default_session_file(home: Option<String>) -> PathBuf {
    home.filter(|h| !h.is_empty())
        .map_or_else(|| PathBuf::from("."), PathBuf::from)
        .join(SESSION_FILE_RELATIVE)
}
