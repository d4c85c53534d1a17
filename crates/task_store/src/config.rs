//! Store configuration.

use std::{fmt, path::PathBuf, str::FromStr, time::Duration};

use auth::PasswordHasher;
use sqlx::postgres::PgConnectOptions;

/// Which backend to construct at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// Volatile, in-process storage.
    Memory,
    /// PostgreSQL server.
    #[default]
    Postgres,
    /// Local SQLite file.
    Sqlite,
}

impl BackendKind {
    /// Returns the configuration string for this backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Postgres => "postgres",
            Self::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for an unknown backend name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown store backend {0:?} (expected memory, postgres or sqlite)")]
pub struct UnknownBackend(pub String);

impl FromStr for BackendKind {
    type Err = UnknownBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "mem" => Ok(Self::Memory),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            "sqlite" => Ok(Self::Sqlite),
            _ => Err(UnknownBackend(s.to_string())),
        }
    }
}

/// PostgreSQL connection settings.
#[derive(Clone)]
pub struct PostgresConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: "postgres".to_string(),
            database: "taskmanager".to_string(),
        }
    }
}

impl PostgresConfig {
    /// Builds sqlx connection options from these settings.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
    }
}

impl fmt::Debug for PostgresConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("database", &self.database)
            .finish()
    }
}

/// Connection pool limits shared by the SQL backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    /// Maximum pool size.
    pub max_connections: u32,
    /// How long to wait for a connection before giving up.
    pub connect_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 5,
            connect_timeout: Duration::from_secs(5),
        }
    }
}

/// Everything needed to construct a task store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Requested backend.
    pub backend: BackendKind,
    /// Used when `backend` is [`BackendKind::Postgres`].
    pub postgres: PostgresConfig,
    /// Used when `backend` is [`BackendKind::Sqlite`].
    pub sqlite_path: PathBuf,
    /// Pool limits for whichever SQL backend is built.
    pub pool: PoolConfig,
    /// Hasher handed to whichever backend is built.
    pub password_hasher: PasswordHasher,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            postgres: PostgresConfig::default(),
            sqlite_path: PathBuf::from("taskmanager.db"),
            pool: PoolConfig::default(),
            password_hasher: PasswordHasher::default(),
        }
    }
}

impl StoreConfig {
    /// Creates a configuration for the given backend with default settings.
    pub fn new(backend: BackendKind) -> Self {
        Self {
            backend,
            ..Default::default()
        }
    }
}
