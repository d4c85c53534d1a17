//! Backend selection.

use std::sync::Arc;

use crate::{
    BackendKind, MemoryTaskStore, PostgresTaskStore, SqliteTaskStore, StoreConfig, TaskStore,
    TaskStoreError,
};

/// Builds the task store described by `config`.
///
/// A durable backend that cannot be reached does not abort startup: the
/// failure is logged and an in-memory store is returned instead. Callers get
/// a `dyn TaskStore` either way and cannot tell which one is active.
pub async fn open_store(config: &StoreConfig) -> Arc<dyn TaskStore> {
    let hasher = config.password_hasher.clone();

    match config.backend {
        BackendKind::Memory => {
            tracing::info!(backend = %config.backend, "Using in-memory task store");
            Arc::new(MemoryTaskStore::new().with_hasher(hasher))
        }
        BackendKind::Postgres => {
            match PostgresTaskStore::connect(&config.postgres, &config.pool).await {
                Ok(store) => {
                    tracing::info!(
                        backend = %config.backend,
                        host = %config.postgres.host,
                        port = config.postgres.port,
                        database = %config.postgres.database,
                        "Using PostgreSQL task store"
                    );
                    Arc::new(store.with_hasher(hasher))
                }
                Err(e) => fall_back_to_memory(config, e),
            }
        }
        BackendKind::Sqlite => {
            match SqliteTaskStore::open(&config.sqlite_path, &config.pool).await {
                Ok(store) => {
                    tracing::info!(backend = %config.backend, "Using SQLite task store");
                    Arc::new(store.with_hasher(hasher))
                }
                Err(e) => fall_back_to_memory(config, e),
            }
        }
    }
}

fn fall_back_to_memory(config: &StoreConfig, error: TaskStoreError) -> Arc<dyn TaskStore> {
    tracing::warn!(
        backend = %config.backend,
        error = %error,
        "Durable task store unavailable, falling back to in-memory store; \
         data will not survive a restart"
    );
    Arc::new(MemoryTaskStore::new().with_hasher(config.password_hasher.clone()))
}
