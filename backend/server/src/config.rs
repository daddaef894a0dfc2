use std::{env, fmt::Display, fs::read_to_string, str::FromStr, time::Duration};

use feeds::remote::{CATALOG_ENDPOINT, TRACKS_ENDPOINT};
use thiserror::Error;
use tracing::{info, warn};

use crate::refresh::Region;

pub const CATALOG_KEY: &str = "satcatData";
pub const TRACKS_KEY: &str = "celestrakData";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {key} value: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    Redis,
    Memory,
}

impl FromStr for CacheBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(CacheBackend::Redis),
            "memory" => Ok(CacheBackend::Memory),
            other => Err(format!("unknown cache backend '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub redis_url: String,
    pub cache_backend: CacheBackend,
    pub catalog_url: String,
    pub tracks_url: String,
    pub catalog_ttl: Duration,
    pub tracks_ttl: Duration,
    pub http_timeout: Duration,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| {
            read_secret(key).or_else(|| {
                env::var(key)
                    .map_err(|_| {
                        info!("{key} not set, using default");
                    })
                    .ok()
            })
        })
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            port: try_load(&lookup, "RUST_PORT", "3000")?,
            redis_url: try_load(&lookup, "REDIS_URL", "redis://127.0.0.1:6379")?,
            cache_backend: try_load(&lookup, "CACHE_BACKEND", "redis")?,
            catalog_url: try_load(&lookup, "CATALOG_URL", CATALOG_ENDPOINT)?,
            tracks_url: try_load(&lookup, "TRACKS_URL", TRACKS_ENDPOINT)?,
            catalog_ttl: seconds(try_load(&lookup, "CATALOG_TTL_SECS", "86400")?),
            tracks_ttl: seconds(try_load(&lookup, "TRACKS_TTL_SECS", "7200")?),
            http_timeout: seconds(try_load(&lookup, "HTTP_TIMEOUT_SECS", "30")?),
        })
    }

    /// Catalog failures never fall back to a stale copy.
    pub fn catalog_region(&self) -> Region {
        Region {
            key: CATALOG_KEY,
            ttl: self.catalog_ttl,
            stale_on_rate_limit: false,
        }
    }

    pub fn tracks_region(&self) -> Region {
        Region {
            key: TRACKS_KEY,
            ttl: self.tracks_ttl,
            stale_on_rate_limit: true,
        }
    }
}

fn seconds(secs: u64) -> Duration {
    Duration::from_secs(secs)
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    lookup(key)
        .unwrap_or_else(|| default.to_string())
        .parse()
        .map_err(|e: T::Err| {
            warn!("Invalid {key} value: {e}");

            ConfigError::Invalid {
                key,
                reason: e.to_string(),
            }
        })
}

fn read_secret(secret_name: &str) -> Option<String> {
    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path).ok().map(|s| s.trim().to_string())
}
