//! Task store trait definitions.

use async_trait::async_trait;
use entities::{
    NewTask, NewUser, Task, TaskId, TaskUpdate, User, UserCredentials, UserId, UserUpdate,
};

use crate::{BackendKind, TaskStoreResult};

/// Storage contract shared by every backend.
///
/// Implementations must be observably identical: the same inputs produce the
/// same records, identifiers and [`ErrorKind`](crate::ErrorKind)s whichever
/// backend is active. Every operation either applies fully or leaves the
/// stored state unchanged. Dropping a returned future cancels the operation.
#[async_trait]
pub trait TaskStore: Send + Sync {
    // =========================================================================
    // Task operations
    // =========================================================================

    /// Lists all tasks in identifier order.
    async fn list_tasks(&self) -> TaskStoreResult<Vec<Task>>;

    /// Gets a task by ID.
    async fn get_task(&self, id: TaskId) -> TaskStoreResult<Task>;

    /// Creates a new task.
    ///
    /// Rejects an empty title. An empty or unrecognized status is stored as
    /// `New`.
    async fn create_task(&self, task: NewTask) -> TaskStoreResult<Task>;

    /// Replaces a task.
    ///
    /// An empty or unrecognized status keeps the stored one.
    async fn update_task(&self, task: TaskUpdate) -> TaskStoreResult<Task>;

    /// Deletes a task. Its identifier is never handed out again.
    async fn delete_task(&self, id: TaskId) -> TaskStoreResult<()>;

    // =========================================================================
    // User operations
    // =========================================================================

    /// Lists all users in identifier order, without credentials.
    async fn list_users(&self) -> TaskStoreResult<Vec<User>>;

    /// Gets a user by ID, without credentials.
    async fn get_user(&self, id: UserId) -> TaskStoreResult<User>;

    /// Gets a user and their password hash by exact email.
    async fn get_user_by_email(&self, email: &str) -> TaskStoreResult<UserCredentials>;

    /// Creates a new user, hashing the supplied password.
    async fn create_user(&self, user: NewUser) -> TaskStoreResult<User>;

    /// Replaces a user.
    ///
    /// Empty fields keep their stored values; a non-empty password is
    /// rehashed.
    async fn update_user(&self, user: UserUpdate) -> TaskStoreResult<User>;

    /// Deletes a user. Its identifier is never handed out again.
    async fn delete_user(&self, id: UserId) -> TaskStoreResult<()>;

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Returns the backend actually serving requests.
    fn backend(&self) -> BackendKind;

    /// Releases backend resources. Calling it more than once is harmless.
    async fn close(&self);
}
