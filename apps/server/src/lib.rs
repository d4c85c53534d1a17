//! Task manager server
//!
//! Bootstraps the process around a [`task_store::TaskStore`]: reads the
//! environment, initializes tracing and picks the storage backend.

pub mod config;

use std::sync::Arc;

use task_store::{open_store, TaskStore};

use crate::config::Config;

/// Initializes the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `log_level` when set.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

/// Opens the store selected by `config`.
pub async fn create_store(config: &Config) -> Arc<dyn TaskStore> {
    let store = open_store(&config.store).await;
    tracing::info!(
        requested = %config.store.backend,
        active = %store.backend(),
        "Task store ready"
    );
    store
}
