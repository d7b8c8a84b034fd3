//! Client configuration.

use std::time::Duration;
use url::Url;

use crate::error::ApiError;

/// Configuration for an [`ApiClient`](crate::ApiClient).
///
/// Holds the backend base URL and the three authentication endpoint
/// paths. The defaults match the portfolio backend's token endpoints.
///
/// # Example
///
/// ```rust
/// use foliogate_client::ApiConfig;
/// use std::time::Duration;
///
/// let config = ApiConfig::parse("http://localhost:8000")
///     .unwrap()
///     .with_timeout(Duration::from_secs(30));
/// assert_eq!(config.token_path, "/api/token/");
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the API backend.
    pub base_url: Url,

    /// Path of the credential login endpoint.
    pub token_path: String,

    /// Path of the token refresh endpoint.
    pub refresh_path: String,

    /// Path of the account registration endpoint.
    pub register_path: String,

    /// Optional per-request timeout applied to the underlying HTTP
    /// client. None means no client-imposed timeout.
    pub timeout: Option<Duration>,
}

impl ApiConfig {
    /// Create a configuration with default endpoint paths.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            token_path: "/api/token/".to_string(),
            refresh_path: "/api/token/refresh/".to_string(),
            register_path: "/api/register/".to_string(),
            timeout: None,
        }
    }

    /// Create a configuration from a base URL string.
    pub fn parse(base_url: &str) -> Result<Self, ApiError> {
        let url = Url::parse(base_url).map_err(|e| ApiError::Config {
            message: format!("invalid base URL {}: {}", base_url, e),
        })?;
        Ok(Self::new(url))
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the authentication endpoint paths.
    pub fn with_auth_paths(
        mut self,
        token_path: impl Into<String>,
        refresh_path: impl Into<String>,
        register_path: impl Into<String>,
    ) -> Self {
        self.token_path = token_path.into();
        self.refresh_path = refresh_path.into();
        self.register_path = register_path.into();
        self
    }

    /// Resolve a request path against the base URL.
    ///
    /// The base URL's own path is kept as a prefix, so a base of
    /// `https://host/app` resolves `/api/token/` to
    /// `https://host/app/api/token/`.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let prefixed = format!(
            "{}/{}",
            self.base_url.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        self.base_url
            .join(&prefixed)
            .map_err(|e| ApiError::Config {
                message: format!("invalid request path {}: {}", path, e),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_resolves_against_root_base() {
        let config = ApiConfig::parse("http://localhost:8000").unwrap();
        let url = config.endpoint("/api/token/").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/token/");
    }

    #[test]
    fn test_endpoint_keeps_base_path_prefix() {
        let config = ApiConfig::parse("https://example.com/app").unwrap();
        let url = config.endpoint("/api/token/").unwrap();
        assert_eq!(url.as_str(), "https://example.com/app/api/token/");

        // A trailing slash on the base makes no difference
        let config = ApiConfig::parse("https://example.com/app/").unwrap();
        let url = config.endpoint("/api/assets/").unwrap();
        assert_eq!(url.as_str(), "https://example.com/app/api/assets/");
    }

    #[test]
    fn test_endpoint_preserves_query_strings() {
        let config = ApiConfig::parse("https://example.com/app").unwrap();
        let url = config.endpoint("/api/assets/?page=2").unwrap();
        assert_eq!(url.as_str(), "https://example.com/app/api/assets/?page=2");
    }

    #[test]
    fn test_parse_rejects_invalid_base_url() {
        assert!(ApiConfig::parse("not a url").is_err());
    }
}
