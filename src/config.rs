//! Configuration Module
//!
//! Loads cache settings from environment variables. The presence of the remote
//! credentials is the only thing that decides which backend gets bound.

use std::env;

/// Credentials for the remote REST key-value backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCredentials {
    /// Base URL of the REST endpoint
    pub url: String,
    /// Bearer token sent with every command
    pub token: String,
}

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Remote backend URL (`UPSTASH_REDIS_REST_URL`)
    pub remote_url: Option<String>,
    /// Remote backend token (`UPSTASH_REDIS_REST_TOKEN`)
    pub remote_token: Option<String>,
    /// Per-call timeout for the remote backend in milliseconds
    pub remote_timeout_ms: u64,
    /// TTL in seconds used when a caller does not pass one
    pub default_ttl: u64,
    /// Admin HTTP server port
    pub server_port: u16,
    /// In-memory expiry sweep interval in seconds
    pub cleanup_interval: u64,
    /// Periodic warming interval in seconds, 0 disables it. Passed to
    /// `spawn_warming_task` by code that owns a `WarmSource`.
    pub warm_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `UPSTASH_REDIS_REST_URL` - Remote backend URL (unset = in-memory)
    /// - `UPSTASH_REDIS_REST_TOKEN` - Remote backend token (unset = in-memory)
    /// - `CACHE_REMOTE_TIMEOUT_MS` - Remote call timeout (default: 2000)
    /// - `CACHE_DEFAULT_TTL` - Default TTL in seconds (default: 3600)
    /// - `SERVER_PORT` - Admin HTTP port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Expiry sweep frequency in seconds (default: 60)
    /// - `WARM_INTERVAL` - Warming frequency in seconds for `spawn_warming_task`
    ///   (default: 0, disabled)
    pub fn from_env() -> Self {
        Self {
            remote_url: non_empty_var("UPSTASH_REDIS_REST_URL"),
            remote_token: non_empty_var("UPSTASH_REDIS_REST_TOKEN"),
            remote_timeout_ms: parsed_var("CACHE_REMOTE_TIMEOUT_MS").unwrap_or(2000),
            default_ttl: parsed_var("CACHE_DEFAULT_TTL").unwrap_or(3600),
            server_port: parsed_var("SERVER_PORT").unwrap_or(3000),
            cleanup_interval: parsed_var("CLEANUP_INTERVAL").unwrap_or(60),
            warm_interval: parsed_var("WARM_INTERVAL").unwrap_or(0),
        }
    }

    /// Returns the remote credentials when both URL and token are set.
    pub fn remote_credentials(&self) -> Option<RemoteCredentials> {
        match (&self.remote_url, &self.remote_token) {
            (Some(url), Some(token)) => Some(RemoteCredentials {
                url: url.clone(),
                token: token.clone(),
            }),
            _ => None,
        }
    }

    /// Interval to hand to `spawn_warming_task`, `None` when warming is off.
    pub fn warming_interval(&self) -> Option<u64> {
        (self.warm_interval > 0).then_some(self.warm_interval)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            remote_url: None,
            remote_token: None,
            remote_timeout_ms: 2000,
            default_ttl: 3600,
            server_port: 3000,
            cleanup_interval: 60,
            warm_interval: 0,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parsed_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.remote_credentials().is_none());
        assert_eq!(config.remote_timeout_ms, 2000);
        assert_eq!(config.default_ttl, 3600);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cleanup_interval, 60);
        assert_eq!(config.warm_interval, 0);
    }

    #[test]
    fn test_credentials_require_both_values() {
        let config = Config {
            remote_url: Some("https://example.upstash.io".to_string()),
            ..Config::default()
        };
        assert!(config.remote_credentials().is_none());

        let config = Config {
            remote_url: Some("https://example.upstash.io".to_string()),
            remote_token: Some("secret".to_string()),
            ..Config::default()
        };
        let creds = config.remote_credentials().unwrap();
        assert_eq!(creds.url, "https://example.upstash.io");
        assert_eq!(creds.token, "secret");
    }

    #[test]
    fn test_warming_interval() {
        assert_eq!(Config::default().warming_interval(), None);

        let config = Config {
            warm_interval: 900,
            ..Config::default()
        };
        assert_eq!(config.warming_interval(), Some(900));
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("UPSTASH_REDIS_REST_URL");
        env::remove_var("UPSTASH_REDIS_REST_TOKEN");
        env::remove_var("CACHE_REMOTE_TIMEOUT_MS");
        env::remove_var("CACHE_DEFAULT_TTL");
        env::remove_var("SERVER_PORT");
        env::remove_var("CLEANUP_INTERVAL");
        env::remove_var("WARM_INTERVAL");

        let config = Config::from_env();
        assert!(config.remote_credentials().is_none());
        assert_eq!(config.default_ttl, 3600);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cleanup_interval, 60);
    }
}
