//! Configuration Module
//!
//! Handles loading and validating proxy configuration from environment
//! variables. Configuration is loaded once at startup and held for the
//! lifetime of the process.

use std::env;
use std::str::FromStr;

use url::Url;

use crate::error::{ProxyError, Result};

// == Store Backend ==
/// Which key-value backend holds the cached documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Remote Redis instance (the production backend)
    Redis,
    /// In-process map, for development and tests
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "redis" => Ok(StoreBackend::Redis),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!("unknown store backend: {other}")),
        }
    }
}

// == Config ==
/// Proxy configuration parameters.
///
/// All values can be configured via environment variables with sensible
/// defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Redis connection URL
    pub redis_url: String,
    /// Prefix prepended to every cache key to isolate this proxy's
    /// entries within a shared store
    pub key_prefix: String,
    /// Base URL of the upstream registry (no trailing slash)
    pub upstream_url: String,
    /// Public-facing base URL of this proxy, substituted into rewritten
    /// tarball URLs (no trailing slash)
    pub local_url: String,
    /// Cached document TTL in seconds
    pub cache_ttl: u64,
    /// Key-value backend selection
    pub store_backend: StoreBackend,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// Unset variables take their defaults. A variable that is set but
    /// cannot be parsed is a configuration error rather than a silent
    /// fallback.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    /// - `REDIS_URL` - Redis connection URL (default: redis://127.0.0.1:6379)
    /// - `KEY_PREFIX` - Cache key namespace prefix (default: "registry-proxy:")
    /// - `UPSTREAM_URL` - Upstream registry base URL (default: https://registry.npmjs.org)
    /// - `LOCAL_URL` - Public base URL used in rewritten tarball links (default: http://localhost:8080)
    /// - `CACHE_TTL` - Document TTL in seconds (default: 3600)
    /// - `STORE_BACKEND` - "redis" or "memory" (default: redis)
    pub fn from_env() -> Result<Self> {
        let config = Self {
            server_port: env_parse("SERVER_PORT", 8080)?,
            redis_url: env_string("REDIS_URL", "redis://127.0.0.1:6379"),
            key_prefix: env_string("KEY_PREFIX", "registry-proxy:"),
            upstream_url: base_url(&env_string("UPSTREAM_URL", "https://registry.npmjs.org"))?,
            local_url: base_url(&env_string("LOCAL_URL", "http://localhost:8080"))?,
            cache_ttl: env_parse("CACHE_TTL", 3600)?,
            store_backend: env_parse("STORE_BACKEND", StoreBackend::Redis)?,
        };

        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 8080,
            redis_url: "redis://127.0.0.1:6379".to_string(),
            key_prefix: "registry-proxy:".to_string(),
            upstream_url: "https://registry.npmjs.org".to_string(),
            local_url: "http://localhost:8080".to_string(),
            cache_ttl: 3600,
            store_backend: StoreBackend::Redis,
        }
    }
}

// == Helpers ==
/// Reads a string variable, falling back to a default when unset.
fn env_string(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Reads and parses a variable, falling back to a default when unset.
/// A set-but-unparseable value is an error.
fn env_parse<T: FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ProxyError::Config(format!("invalid value for {name}: {raw}"))),
        Err(_) => Ok(default),
    }
}

/// Validates a base URL and strips any trailing slash so that request
/// paths (which always start with `/`) concatenate cleanly.
fn base_url(raw: &str) -> Result<String> {
    Url::parse(raw).map_err(|e| ProxyError::Config(format!("invalid base URL {raw}: {e}")))?;
    Ok(raw.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.key_prefix, "registry-proxy:");
        assert_eq!(config.upstream_url, "https://registry.npmjs.org");
        assert_eq!(config.local_url, "http://localhost:8080");
        assert_eq!(config.cache_ttl, 3600);
        assert_eq!(config.store_backend, StoreBackend::Redis);
    }

    #[test]
    fn test_store_backend_from_str() {
        assert_eq!("redis".parse::<StoreBackend>(), Ok(StoreBackend::Redis));
        assert_eq!("memory".parse::<StoreBackend>(), Ok(StoreBackend::Memory));
        assert!("postgres".parse::<StoreBackend>().is_err());
    }

    #[test]
    fn test_base_url_strips_trailing_slash() {
        assert_eq!(
            base_url("https://registry.npmjs.org/").unwrap(),
            "https://registry.npmjs.org"
        );
    }

    #[test]
    fn test_base_url_rejects_garbage() {
        assert!(matches!(base_url("not a url"), Err(ProxyError::Config(_))));
    }

    // Environment access is process-global, so everything that touches
    // env vars lives in one test to avoid races under the parallel
    // test runner.
    #[test]
    fn test_config_from_env() {
        env::remove_var("SERVER_PORT");
        env::remove_var("REDIS_URL");
        env::remove_var("KEY_PREFIX");
        env::remove_var("UPSTREAM_URL");
        env::remove_var("LOCAL_URL");
        env::remove_var("CACHE_TTL");
        env::remove_var("STORE_BACKEND");

        let config = Config::from_env().unwrap();
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.cache_ttl, 3600);
        assert_eq!(config.store_backend, StoreBackend::Redis);

        env::set_var("SERVER_PORT", "9000");
        env::set_var("CACHE_TTL", "60");
        env::set_var("STORE_BACKEND", "memory");
        let config = Config::from_env().unwrap();
        assert_eq!(config.server_port, 9000);
        assert_eq!(config.cache_ttl, 60);
        assert_eq!(config.store_backend, StoreBackend::Memory);

        env::set_var("SERVER_PORT", "not-a-port");
        assert!(matches!(Config::from_env(), Err(ProxyError::Config(_))));

        env::remove_var("SERVER_PORT");
        env::remove_var("CACHE_TTL");
        env::remove_var("STORE_BACKEND");
    }
}
