//! Server configuration from environment variables.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::ocm::{CacheConfig, OcmConfig};

const DEFAULT_REGION: &str = "IN";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_BIND_ADDR: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000);
const DEFAULT_CACHE_TTL_SECS: u64 = 60 * 60;

/// Errors reading configuration.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be set")]
    Missing { name: &'static str },

    #[error("{name} is invalid ({value:?}): {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Everything `main` needs to start the server.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Open Charge Map API key. Empty when serving mock data.
    pub api_key: String,

    /// Region used when a request doesn't name one.
    pub default_region: String,

    pub timeout: Duration,

    /// Override for the Open Charge Map base URL.
    pub base_url: Option<String>,

    /// Serve `{REGION}.json` files from here instead of calling the API.
    pub mock_dir: Option<PathBuf>,

    pub bind_addr: SocketAddr,

    pub cache_ttl: Duration,
}

impl AppConfig {
    /// Read configuration from the process environment.
    ///
    /// | Variable           | Default                               |
    /// |--------------------|---------------------------------------|
    /// | `OCM_API_KEY`      | required unless `OCM_MOCK_DIR` is set |
    /// | `OCM_REGION`       | `IN`                                  |
    /// | `OCM_TIMEOUT_SECS` | `10`                                  |
    /// | `OCM_BASE_URL`     | public API                            |
    /// | `OCM_MOCK_DIR`     | unset                                 |
    /// | `BIND_ADDR`        | `127.0.0.1:3000`                      |
    /// | `CACHE_TTL_SECS`   | `3600`                                |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mock_dir = var("OCM_MOCK_DIR").map(PathBuf::from);
        let api_key = match (var("OCM_API_KEY"), &mock_dir) {
            (Some(key), _) => key,
            (None, Some(_)) => String::new(),
            (None, None) => return Err(ConfigError::Missing { name: "OCM_API_KEY" }),
        };

        let default_region = var("OCM_REGION")
            .unwrap_or_else(|| DEFAULT_REGION.to_string())
            .to_ascii_uppercase();

        let timeout_secs =
            parse_or("OCM_TIMEOUT_SECS", var("OCM_TIMEOUT_SECS"), DEFAULT_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "OCM_TIMEOUT_SECS",
                value: "0".into(),
                reason: "must be positive".into(),
            });
        }

        let bind_addr = parse_or("BIND_ADDR", var("BIND_ADDR"), DEFAULT_BIND_ADDR)?;

        let cache_ttl_secs =
            parse_or("CACHE_TTL_SECS", var("CACHE_TTL_SECS"), DEFAULT_CACHE_TTL_SECS)?;

        Ok(Self {
            api_key,
            default_region,
            timeout: Duration::from_secs(timeout_secs),
            base_url: var("OCM_BASE_URL"),
            mock_dir,
            bind_addr,
            cache_ttl: Duration::from_secs(cache_ttl_secs),
        })
    }

    /// Client settings for the live API.
    pub fn ocm_config(&self) -> OcmConfig {
        let config = OcmConfig::new(&self.api_key, self.timeout);
        match &self.base_url {
            Some(url) => config.with_base_url(url),
            None => config,
        }
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            ttl: self.cache_ttl,
            ..CacheConfig::default()
        }
    }
}

fn parse_or<T>(name: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(value) => value.parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
            value,
        }),
    }
}
