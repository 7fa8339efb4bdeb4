//! Server configuration from environment variables.
//!
//! Load configuration using `Config::from_env()` after calling `dotenvy::dotenv()`.

use std::time::Duration;

pub const DEFAULT_API_UPSTREAM_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_API_PROXY_PREFIX: &str = "/api";
pub const DEFAULT_PROXY_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SITE_ORIGIN: &str = "http://127.0.0.1:4200";

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the REST backend
    /// Example: https://api.example.org/api
    pub api_upstream_url: String,

    /// Same-origin path the browser calls; everything below it is forwarded
    pub api_proxy_prefix: String,

    /// Upper bound for one proxied request
    pub proxy_timeout_secs: u64,

    /// Public origin of this server, used to resolve the client's relative
    /// API URLs outside the browser
    pub site_origin: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Call `dotenvy::dotenv()` before this to load from `.env` file.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank or invalid values fall back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_proxy_prefix = value("API_PROXY_PREFIX")
            .map(|p| format!("/{}", p.trim_matches('/')))
            .unwrap_or_else(|| DEFAULT_API_PROXY_PREFIX.to_string());

        let proxy_timeout_secs = match value("PROXY_TIMEOUT_SECS") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!("Invalid PROXY_TIMEOUT_SECS {:?}, using default", raw);
                DEFAULT_PROXY_TIMEOUT_SECS
            }),
            None => DEFAULT_PROXY_TIMEOUT_SECS,
        };

        Self {
            api_upstream_url: value("API_UPSTREAM_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_UPSTREAM_URL.to_string()),
            api_proxy_prefix,
            proxy_timeout_secs,
            site_origin: value("SITE_ORIGIN")
                .map(|o| o.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_SITE_ORIGIN.to_string()),
        }
    }

    pub fn proxy_timeout(&self) -> Duration {
        Duration::from_secs(self.proxy_timeout_secs)
    }

    /// Route pattern matched by the proxy handler
    pub fn proxy_route(&self) -> String {
        format!("{}/{{*path}}", self.api_proxy_prefix)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    // ========================================================================
    // Lookup-based tests (no env var dependencies - thread safe)
    // ========================================================================

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);

        assert_eq!(config.api_upstream_url, "http://localhost:3000/api");
        assert_eq!(config.api_proxy_prefix, "/api");
        assert_eq!(config.proxy_timeout(), Duration::from_secs(30));
        assert_eq!(config.site_origin, DEFAULT_SITE_ORIGIN);
    }

    #[test]
    fn test_all_fields() {
        let config = config_from(&[
            ("API_UPSTREAM_URL", "https://backend.example/api/"),
            ("API_PROXY_PREFIX", "backend/"),
            ("PROXY_TIMEOUT_SECS", "5"),
            ("SITE_ORIGIN", "https://pollution.example/"),
        ]);

        assert_eq!(config.api_upstream_url, "https://backend.example/api");
        assert_eq!(config.api_proxy_prefix, "/backend");
        assert_eq!(config.proxy_timeout_secs, 5);
        assert_eq!(config.proxy_route(), "/backend/{*path}");
        assert_eq!(config.site_origin, "https://pollution.example");
    }

    #[test]
    fn test_blank_and_invalid_values_fall_back() {
        let config = config_from(&[
            ("API_UPSTREAM_URL", "   "),
            ("PROXY_TIMEOUT_SECS", "soon"),
        ]);

        assert_eq!(config.api_upstream_url, DEFAULT_API_UPSTREAM_URL);
        assert_eq!(config.proxy_timeout_secs, DEFAULT_PROXY_TIMEOUT_SECS);
    }

    #[test]
    fn test_config_from_env_returns_config() {
        // Actual values depend on environment, so only the shape is checked
        let config = Config::from_env();
        assert!(config.api_proxy_prefix.starts_with('/'));
    }

    #[test]
    fn test_config_clone_and_debug() {
        let config = config_from(&[("API_UPSTREAM_URL", "http://10.0.0.2:3000/api")]);
        let cloned = config.clone();

        assert_eq!(config, cloned);
        assert!(format!("{:?}", config).contains("10.0.0.2"));
    }
}
