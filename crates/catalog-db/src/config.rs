//! Catalog configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable                          | Default        |
//! |-----------------------------------|----------------|
//! | `CATALOG_STORE`                   | `memory`       |
//! | `CATALOG_DB_PATH`                 | `./catalog.db` |
//! | `CATALOG_DB_MAX_CONNECTIONS`      | `5`            |
//! | `CATALOG_DB_ACQUIRE_TIMEOUT_SECS` | `30`           |

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::pool::DbConfig;

/// Which document store backs the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    /// Process-local store, lost on exit.
    Memory,
    /// SQLite file with JSON document bodies.
    Sqlite,
}

impl FromStr for StoreKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreKind::Memory),
            "sqlite" => Ok(StoreKind::Sqlite),
            _ => Err(ConfigError::InvalidValue("CATALOG_STORE".to_string())),
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreKind::Memory => f.write_str("memory"),
            StoreKind::Sqlite => f.write_str("sqlite"),
        }
    }
}

/// Catalog configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Backend selection
    pub store: StoreKind,

    /// SQLite database file (ignored for the memory store)
    pub db_path: PathBuf,

    /// SQLite pool size
    pub max_connections: u32,

    /// Seconds a store call waits for a free SQLite connection
    pub acquire_timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        CatalogConfig {
            store: StoreKind::Memory,
            db_path: PathBuf::from("./catalog.db"),
            max_connections: 5,
            acquire_timeout_secs: 30,
        }
    }
}

impl CatalogConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = CatalogConfig::default();

        let store = match lookup("CATALOG_STORE") {
            Some(raw) => raw.parse()?,
            None => defaults.store,
        };

        let db_path = lookup("CATALOG_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);

        let max_connections = match lookup("CATALOG_DB_MAX_CONNECTIONS") {
            Some(raw) => positive(&raw, "CATALOG_DB_MAX_CONNECTIONS")?,
            None => defaults.max_connections,
        };

        let acquire_timeout_secs = match lookup("CATALOG_DB_ACQUIRE_TIMEOUT_SECS") {
            Some(raw) => positive(&raw, "CATALOG_DB_ACQUIRE_TIMEOUT_SECS")?,
            None => defaults.acquire_timeout_secs,
        };

        Ok(CatalogConfig {
            store,
            db_path,
            max_connections,
            acquire_timeout_secs,
        })
    }

    /// Pool configuration for the SQLite backend.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.db_path.clone())
            .max_connections(self.max_connections)
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
    }
}

fn positive<T: FromStr + PartialOrd + Default>(raw: &str, key: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse::<T>()
        .ok()
        .filter(|n| *n > T::default())
        .ok_or_else(|| ConfigError::InvalidValue(key.to_string()))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
