//! Client configuration.
//!
//! Environment variables:
//! - `LADLE_API_URL`: server base URL (default `http://localhost:3000`)
//! - `LADLE_SESSION_FILE`: where the session is persisted (default `~/.ladle/session.json`)
//! - `LADLE_TIMEOUT_SECS`: request timeout (default 30)

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ApiError;

pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL without trailing slash
    pub api_base_url: String,
    pub session_file: PathBuf,
    pub timeout: Duration,
}

impl ClientConfig {
    /// Configuration from the environment with defaults.
    pub fn from_env() -> Result<Self, ApiError> {
        ClientConfigBuilder::new().build()
    }

    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Default session file: ~/.ladle/session.json
    pub fn default_session_file() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".ladle").join("session.json"))
            .unwrap_or_else(|| PathBuf::from(".ladle-session.json"))
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfigBuilder {
    api_base_url: String,
    session_file: PathBuf,
    timeout: Duration,
}

impl Default for ClientConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientConfigBuilder {
    /// Builder seeded from the environment, falling back to defaults.
    pub fn new() -> Self {
        let api_base_url =
            std::env::var("LADLE_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let session_file = std::env::var("LADLE_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| ClientConfig::default_session_file());

        let timeout_secs = std::env::var("LADLE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            api_base_url,
            session_file,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = path.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validate the base URL and build the config.
    pub fn build(self) -> Result<ClientConfig, ApiError> {
        let parsed = url::Url::parse(&self.api_base_url)
            .map_err(|e| ApiError::Validation(format!("invalid API URL {:?}: {}", self.api_base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::Validation(format!(
                "API URL must be http or https, got {:?}",
                self.api_base_url
            )));
        }

        Ok(ClientConfig {
            api_base_url: self.api_base_url.trim_end_matches('/').to_string(),
            session_file: self.session_file,
            timeout: self.timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_trims_trailing_slash() {
        let config = ClientConfigBuilder::new()
            .api_base_url("http://recipes.example.com/")
            .session_file("/tmp/session.json")
            .build()
            .unwrap();
        assert_eq!(config.api_base_url, "http://recipes.example.com");
        assert_eq!(config.session_file, PathBuf::from("/tmp/session.json"));
    }

    #[test]
    fn test_build_rejects_bad_url() {
        assert!(ClientConfigBuilder::new().api_base_url("not a url").build().is_err());
        assert!(ClientConfigBuilder::new()
            .api_base_url("ftp://example.com")
            .build()
            .is_err());
    }
}
