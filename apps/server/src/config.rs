//! Server configuration

use std::{fmt::Display, path::PathBuf, str::FromStr, time::Duration};

use task_store::{BackendKind, StoreConfig};

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Store backend and its connection settings.
    pub store: StoreConfig,
    /// Log level used when `RUST_LOG` is not set.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from an arbitrary variable source.
    ///
    /// Unset and empty variables fall back to their defaults. Values that are
    /// set but malformed are rejected.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(backend) = parse_var::<BackendKind>(&var, "STORE_BACKEND")? {
            config.store.backend = backend;
        }
        if let Some(value) = var("USE_MEMORY") {
            if parse_flag("USE_MEMORY", &value)? {
                config.store.backend = BackendKind::Memory;
            }
        }

        let postgres = &mut config.store.postgres;
        if let Some(host) = var("DB_HOST") {
            postgres.host = host;
        }
        if let Some(port) = parse_var(&var, "DB_PORT")? {
            postgres.port = port;
        }
        if let Some(user) = var("DB_USER") {
            postgres.user = user;
        }
        if let Some(password) = var("DB_PASSWORD") {
            postgres.password = password;
        }
        if let Some(database) = var("DB_NAME") {
            postgres.database = database;
        }
        if let Some(max) = parse_var::<u32>(&var, "DB_MAX_CONNECTIONS")? {
            if max == 0 {
                return Err(ConfigError::invalid("DB_MAX_CONNECTIONS", "0", "must be positive"));
            }
            config.store.pool.max_connections = max;
        }
        if let Some(secs) = parse_var(&var, "DB_CONNECT_TIMEOUT_SECS")? {
            config.store.pool.connect_timeout = Duration::from_secs(secs);
        }

        if let Some(path) = var("SQLITE_PATH") {
            config.store.sqlite_path = PathBuf::from(path);
        }
        if let Some(level) = var("LOG_LEVEL") {
            config.log_level = level;
        }

        Ok(config)
    }
}

fn parse_var<T>(
    var: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    var(key)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|e: T::Err| ConfigError::invalid(key, &value, e))
        })
        .transpose()
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(ConfigError::invalid(key, value, "expected true, false, 1 or 0")),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(key: &'static str, value: &str, reason: impl Display) -> Self {
        Self::InvalidValue {
            key,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}
