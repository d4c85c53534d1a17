//! SQLite task store implementation.

use std::{path::Path, str::FromStr};

use async_trait::async_trait;
use auth::PasswordHasher;
use entities::{
    NewTask, NewUser, Task, TaskId, TaskUpdate, User, UserCredentials, UserId, UserUpdate,
};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

use crate::{
    config::PoolConfig,
    rows::{map_rows, CredentialsRow, TaskRow, UserRow},
    rules::{
        hash_password, prepare_new_task, prepare_new_user, prepare_task_update,
        prepare_user_update,
    },
    BackendKind, TaskStore, TaskStoreError, TaskStoreResult,
};

// AUTOINCREMENT keeps SQLite from reusing the id of a deleted last row.
const SCHEMA: [&str; 2] = [
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tasks (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        description TEXT,
        status TEXT NOT NULL DEFAULT 'new'
            CHECK (status IN ('new', 'in_progress', 'completed'))
    )
    "#,
];

/// SQLite task store (durable, single-process).
///
/// Follows the same pre-check plus `UNIQUE` constraint scheme as
/// [`PostgresTaskStore`](crate::PostgresTaskStore).
#[derive(Debug, Clone)]
pub struct SqliteTaskStore {
    pool: SqlitePool,
    hasher: PasswordHasher,
}

impl SqliteTaskStore {
    /// Wraps an existing pool. Call [`init`](Self::init) before use.
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            hasher: PasswordHasher::default(),
        }
    }

    /// Opens (creating if needed) the database file at `path`.
    pub async fn open(path: &Path, limits: &PoolConfig) -> TaskStoreResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(sqlx::Error::Io)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(limits.max_connections)
            .acquire_timeout(limits.connect_timeout)
            .connect_with(options)
            .await?;

        let store = Self::new(pool);
        store.init().await?;
        tracing::info!(path = %path.display(), "Opened SQLite task store");
        Ok(store)
    }

    /// Opens a private in-memory database.
    ///
    /// The pool is pinned to a single connection that never expires, since
    /// every SQLite in-memory connection is a separate database.
    pub async fn in_memory() -> TaskStoreResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let store = Self::new(pool);
        store.init().await?;
        Ok(store)
    }

    /// Replaces the password hasher.
    pub fn with_hasher(mut self, hasher: PasswordHasher) -> Self {
        self.hasher = hasher;
        self
    }

    /// Returns the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Creates the `users` and `tasks` tables if they are missing.
    pub async fn init(&self) -> TaskStoreResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl TaskStore for SqliteTaskStore {
    // =========================================================================
    // Task operations
    // =========================================================================

    async fn list_tasks(&self) -> TaskStoreResult<Vec<Task>> {
        let rows: Vec<TaskRow> =
            sqlx::query_as("SELECT id, title, description, status FROM tasks ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        map_rows(rows)
    }

    async fn get_task(&self, id: TaskId) -> TaskStoreResult<Task> {
        let row: Option<TaskRow> =
            sqlx::query_as("SELECT id, title, description, status FROM tasks WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        row.ok_or_else(|| TaskStoreError::not_found("Task", id))?
            .try_into()
    }

    async fn create_task(&self, task: NewTask) -> TaskStoreResult<Task> {
        let draft = prepare_new_task(task)?;

        let row: TaskRow = sqlx::query_as(
            "INSERT INTO tasks (title, description, status) VALUES (?, ?, ?) \
             RETURNING id, title, description, status",
        )
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(draft.status.as_str())
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(task_id = row.id, status = %draft.status, "Created task");
        row.try_into()
    }

    async fn update_task(&self, task: TaskUpdate) -> TaskStoreResult<Task> {
        let replacement = prepare_task_update(task)?;

        let row: Option<TaskRow> = sqlx::query_as(
            "UPDATE tasks SET title = ?, description = ?, status = COALESCE(?, status) \
             WHERE id = ? RETURNING id, title, description, status",
        )
        .bind(&replacement.title)
        .bind(&replacement.description)
        .bind(replacement.status.map(|s| s.as_str()))
        .bind(replacement.id)
        .fetch_optional(&self.pool)
        .await?;

        let row = row.ok_or_else(|| TaskStoreError::not_found("Task", replacement.id))?;
        tracing::debug!(task_id = row.id, status = %row.status, "Updated task");
        row.try_into()
    }

    async fn delete_task(&self, id: TaskId) -> TaskStoreResult<()> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(TaskStoreError::not_found("Task", id));
        }
        tracing::debug!(task_id = id, "Deleted task");
        Ok(())
    }

    // =========================================================================
    // User operations
    // =========================================================================

    async fn list_users(&self) -> TaskStoreResult<Vec<User>> {
        let rows: Vec<UserRow> = sqlx::query_as("SELECT id, name, email FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        map_rows(rows)
    }

    async fn get_user(&self, id: UserId) -> TaskStoreResult<User> {
        let row: Option<UserRow> = sqlx::query_as("SELECT id, name, email FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.ok_or_else(|| TaskStoreError::not_found("User", id))?
            .try_into()
    }

    async fn get_user_by_email(&self, email: &str) -> TaskStoreResult<UserCredentials> {
        let row: Option<CredentialsRow> =
            sqlx::query_as("SELECT id, name, email, password_hash FROM users WHERE email = ?")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
        row.ok_or_else(|| TaskStoreError::not_found("User", email))?
            .try_into()
    }

    async fn create_user(&self, user: NewUser) -> TaskStoreResult<User> {
        let draft = prepare_new_user(user)?;
        let email = draft.email.as_str();

        let taken: i64 = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = ?)")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;
        if taken != 0 {
            return Err(TaskStoreError::duplicate_email(email));
        }

        let password_hash = hash_password(&self.hasher, draft.password).await?;

        let row: UserRow = sqlx::query_as(
            "INSERT INTO users (name, email, password_hash) VALUES (?, ?, ?) \
             RETURNING id, name, email",
        )
        .bind(&draft.name)
        .bind(email)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| TaskStoreError::from_user_write(e, email))?;

        tracing::debug!(user_id = row.id, "Created user");
        row.try_into()
    }

    async fn update_user(&self, user: UserUpdate) -> TaskStoreResult<User> {
        let replacement = prepare_user_update(user)?;
        let email = replacement.email.as_ref().map(|e| e.as_str());

        let (found, taken): (i64, i64) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM users WHERE id = ?), \
             EXISTS(SELECT 1 FROM users WHERE email = ? AND id <> ?)",
        )
        .bind(replacement.id)
        .bind(email)
        .bind(replacement.id)
        .fetch_one(&self.pool)
        .await?;
        if found == 0 {
            return Err(TaskStoreError::not_found("User", replacement.id));
        }
        if let (true, Some(email)) = (taken != 0, email) {
            return Err(TaskStoreError::duplicate_email(email));
        }

        let password_hash = match replacement.password {
            Some(password) => Some(hash_password(&self.hasher, password).await?),
            None => None,
        };

        let row: Option<UserRow> = sqlx::query_as(
            "UPDATE users SET name = COALESCE(?, name), email = COALESCE(?, email), \
             password_hash = COALESCE(?, password_hash) WHERE id = ? \
             RETURNING id, name, email",
        )
        .bind(&replacement.name)
        .bind(email)
        .bind(&password_hash)
        .bind(replacement.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| TaskStoreError::from_user_write(e, email.unwrap_or_default()))?;

        let row = row.ok_or_else(|| TaskStoreError::not_found("User", replacement.id))?;
        tracing::debug!(user_id = row.id, "Updated user");
        row.try_into()
    }

    async fn delete_user(&self, id: UserId) -> TaskStoreResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(TaskStoreError::not_found("User", id));
        }
        tracing::debug!(user_id = id, "Deleted user");
        Ok(())
    }

    fn backend(&self) -> BackendKind {
        BackendKind::Sqlite
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
