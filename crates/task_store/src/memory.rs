//! In-memory task store implementation.

use std::collections::HashSet;

use async_trait::async_trait;
use auth::PasswordHasher;
use entities::{
    Email, NewTask, NewUser, Task, TaskId, TaskUpdate, User, UserCredentials, UserId, UserUpdate,
};
use tokio::sync::Mutex;

use crate::{
    rules::{
        hash_password, prepare_new_task, prepare_new_user, prepare_task_update,
        prepare_user_update,
    },
    BackendKind, TaskStore, TaskStoreError, TaskStoreResult,
};

#[derive(Debug, Default)]
struct MemoryState {
    tasks: Vec<Task>,
    users: Vec<UserCredentials>,
    emails: HashSet<Email>,
    last_task_id: TaskId,
    last_user_id: UserId,
}

impl MemoryState {
    fn task_index(&self, id: TaskId) -> TaskStoreResult<usize> {
        self.tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| TaskStoreError::not_found("Task", id))
    }

    fn user_index(&self, id: UserId) -> TaskStoreResult<usize> {
        self.users
            .iter()
            .position(|u| u.user.id == id)
            .ok_or_else(|| TaskStoreError::not_found("User", id))
    }

    fn ensure_email_free(&self, email: &Email) -> TaskStoreResult<()> {
        if self.emails.contains(email) {
            return Err(TaskStoreError::duplicate_email(email.as_str()));
        }
        Ok(())
    }

    /// Locates the user to update and checks that `email`, if it changes,
    /// belongs to nobody else.
    fn user_update_target(&self, id: UserId, email: Option<&Email>) -> TaskStoreResult<usize> {
        let index = self.user_index(id)?;
        match email {
            Some(email) if *email != self.users[index].user.email => {
                self.ensure_email_free(email)?;
            }
            _ => {}
        }
        Ok(index)
    }
}

/// Volatile task store.
///
/// Nothing survives a restart. All state sits behind a single mutex, so each
/// operation is atomic with respect to every other one. The mutex is never
/// held while a password is hashed: user writes check under the lock, hash
/// without it, then check again before committing. Returned values are always
/// copies.
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    state: Mutex<MemoryState>,
    hasher: PasswordHasher,
}

impl MemoryTaskStore {
    /// Creates a new in-memory task store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the password hasher.
    pub fn with_hasher(mut self, hasher: PasswordHasher) -> Self {
        self.hasher = hasher;
        self
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    // =========================================================================
    // Task operations
    // =========================================================================

    async fn list_tasks(&self) -> TaskStoreResult<Vec<Task>> {
        let state = self.state.lock().await;
        Ok(state.tasks.clone())
    }

    async fn get_task(&self, id: TaskId) -> TaskStoreResult<Task> {
        let state = self.state.lock().await;
        let index = state.task_index(id)?;
        Ok(state.tasks[index].clone())
    }

    async fn create_task(&self, task: NewTask) -> TaskStoreResult<Task> {
        let draft = prepare_new_task(task)?;

        let mut state = self.state.lock().await;
        state.last_task_id += 1;
        let task = Task {
            id: state.last_task_id,
            title: draft.title,
            description: draft.description,
            status: draft.status,
        };
        state.tasks.push(task.clone());

        tracing::debug!(task_id = task.id, status = %task.status, "Created task");
        Ok(task)
    }

    async fn update_task(&self, task: TaskUpdate) -> TaskStoreResult<Task> {
        let replacement = prepare_task_update(task)?;

        let mut state = self.state.lock().await;
        let index = state.task_index(replacement.id)?;
        let stored = &mut state.tasks[index];
        *stored = Task {
            id: replacement.id,
            title: replacement.title,
            description: replacement.description,
            status: replacement.status.unwrap_or(stored.status),
        };

        tracing::debug!(task_id = stored.id, status = %stored.status, "Updated task");
        Ok(stored.clone())
    }

    async fn delete_task(&self, id: TaskId) -> TaskStoreResult<()> {
        let mut state = self.state.lock().await;
        let index = state.task_index(id)?;
        state.tasks.remove(index);

        tracing::debug!(task_id = id, "Deleted task");
        Ok(())
    }

    // =========================================================================
    // User operations
    // =========================================================================

    async fn list_users(&self) -> TaskStoreResult<Vec<User>> {
        let state = self.state.lock().await;
        Ok(state.users.iter().map(|u| u.user.clone()).collect())
    }

    async fn get_user(&self, id: UserId) -> TaskStoreResult<User> {
        let state = self.state.lock().await;
        let index = state.user_index(id)?;
        Ok(state.users[index].user.clone())
    }

    async fn get_user_by_email(&self, email: &str) -> TaskStoreResult<UserCredentials> {
        let state = self.state.lock().await;
        state
            .users
            .iter()
            .find(|u| u.user.email == *email)
            .cloned()
            .ok_or_else(|| TaskStoreError::not_found("User", email))
    }

    async fn create_user(&self, user: NewUser) -> TaskStoreResult<User> {
        let draft = prepare_new_user(user)?;

        // Hashing is slow, so it runs unlocked between two checks.
        self.state.lock().await.ensure_email_free(&draft.email)?;
        let password_hash = hash_password(&self.hasher, draft.password).await?;

        let mut state = self.state.lock().await;
        state.ensure_email_free(&draft.email)?;

        state.last_user_id += 1;
        let user = User {
            id: state.last_user_id,
            name: draft.name,
            email: draft.email,
        };
        state.emails.insert(user.email.clone());
        state.users.push(UserCredentials {
            user: user.clone(),
            password_hash,
        });

        tracing::debug!(user_id = user.id, "Created user");
        Ok(user)
    }

    async fn update_user(&self, user: UserUpdate) -> TaskStoreResult<User> {
        let replacement = prepare_user_update(user)?;
        let email = replacement.email.as_ref();

        let password_hash = match replacement.password {
            Some(password) => {
                self.state
                    .lock()
                    .await
                    .user_update_target(replacement.id, email)?;
                Some(hash_password(&self.hasher, password).await?)
            }
            None => None,
        };

        let mut state = self.state.lock().await;
        let index = state.user_update_target(replacement.id, email)?;

        if let Some(email) = replacement.email {
            let current = &state.users[index].user.email;
            if email != *current {
                let current = current.clone();
                state.emails.remove(&current);
                state.emails.insert(email.clone());
                state.users[index].user.email = email;
            }
        }

        let stored = &mut state.users[index];
        if let Some(name) = replacement.name {
            stored.user.name = name;
        }
        if let Some(password_hash) = password_hash {
            stored.password_hash = password_hash;
        }

        tracing::debug!(user_id = stored.user.id, "Updated user");
        Ok(stored.user.clone())
    }

    async fn delete_user(&self, id: UserId) -> TaskStoreResult<()> {
        let mut state = self.state.lock().await;
        let index = state.user_index(id)?;
        let removed = state.users.remove(index);
        state.emails.remove(&removed.user.email);

        tracing::debug!(user_id = id, "Deleted user");
        Ok(())
    }

    fn backend(&self) -> BackendKind {
        BackendKind::Memory
    }

    async fn close(&self) {}
}
