//! Runtime configuration read from the environment.

use std::env;

use tracing::warn;

use crate::storage::DEFAULT_MAX_CONNECTIONS;

/// Default port if not specified via environment variable.
pub const DEFAULT_PORT: u16 = 3000;

/// Default database path if not specified via environment variable.
pub const DEFAULT_DB_PATH: &str = "sqlite:dermtrack.db?mode=rwc";

/// Default storage scope.
pub const DEFAULT_SCOPE: &str = "default";

/// Service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Port the HTTP API listens on.
    pub port: u16,

    /// SQLite connection string for the record store.
    pub database_url: String,

    /// Namespace for this device's keys inside the database.
    pub storage_scope: String,

    /// Pool size for file-backed databases.
    pub max_connections: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database_url: DEFAULT_DB_PATH.to_string(),
            storage_scope: DEFAULT_SCOPE.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl Config {
    /// Load configuration from `DERMTRACK_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Missing variables take their default; unparsable numbers are logged and
    /// also fall back to the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            port: parse_or(&lookup, "DERMTRACK_PORT", defaults.port),
            database_url: lookup("DERMTRACK_DATABASE_URL").unwrap_or(defaults.database_url),
            storage_scope: lookup("DERMTRACK_STORAGE_SCOPE")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.storage_scope),
            max_connections: parse_or(&lookup, "DERMTRACK_MAX_CONNECTIONS", defaults.max_connections),
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    match lookup(name) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(variable = name, value = %raw, "Invalid value, using default");
            default
        }),
        None => default,
    }
}
