//! Runtime configuration from environment variables (and `.env`).

use crate::error::{Error, Result};
use crate::notify::DEFAULT_TOPIC;
use crate::observability::DEFAULT_TTL;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DB_CONNECTIONS: u32 = 5;
pub const DEFAULT_REDIS_POOL_SIZE: usize = 16;

/// Everything the binary needs to wire collaborators and bind.
///
/// Unset `DATABASE_URL` selects the in-memory store, unset `REDIS_URL` the
/// in-memory cache and sink.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub redis_url: Option<String>,
    pub redis_pool_size: usize,
    pub cache_ttl: Duration,
    pub notify_topic: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database_url: None,
            database_max_connections: DEFAULT_DB_CONNECTIONS,
            redis_url: None,
            redis_pool_size: DEFAULT_REDIS_POOL_SIZE,
            cache_ttl: DEFAULT_TTL,
            notify_topic: DEFAULT_TOPIC.to_string(),
        }
    }
}

impl AppConfig {
    /// Load `.env` if present, then read the process environment.
    ///
    /// # Errors
    /// Returns `Error::ConfigError` if a numeric variable does not parse.
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenv::dotenv() {
            debug!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    ///
    /// # Errors
    /// Returns `Error::ConfigError` if a numeric variable does not parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = AppConfig::default();

        let ttl_secs: u64 = parse_or(&var, "CACHE_TTL_SECS", defaults.cache_ttl.as_secs())?;
        if ttl_secs == 0 {
            return Err(Error::ConfigError(
                "CACHE_TTL_SECS must be greater than 0".to_string(),
            ));
        }

        Ok(AppConfig {
            host: var("SERVER_HOST").unwrap_or(defaults.host),
            port: parse_or(&var, "SERVER_PORT", defaults.port)?,
            database_url: var("DATABASE_URL"),
            database_max_connections: parse_or(
                &var,
                "DATABASE_MAX_CONNECTIONS",
                defaults.database_max_connections,
            )?,
            redis_url: var("REDIS_URL"),
            redis_pool_size: parse_or(&var, "REDIS_POOL_SIZE", defaults.redis_pool_size)?,
            cache_ttl: Duration::from_secs(ttl_secs),
            notify_topic: var("NOTIFY_TOPIC").unwrap_or(defaults.notify_topic),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T, F>(var: &F, name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match var(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e| {
            Error::ConfigError(format!("{} has invalid value {:?}: {}", name, raw, e))
        }),
    }
}
