//! Field-level rules shared by every backend.
//!
//! Backends never interpret caller input themselves. They run it through the
//! functions here first and then store whatever comes out, which is what keeps
//! the memory and SQL backends behaviorally identical.

use auth::{AuthError, PasswordHasher};
use entities::{Email, NewTask, NewUser, TaskId, TaskStatus, TaskUpdate, UserId, UserUpdate};

use crate::{TaskStoreError, TaskStoreResult};

/// A task ready to be inserted.
#[derive(Debug, Clone)]
pub(crate) struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
}

/// A validated task replacement.
#[derive(Debug, Clone)]
pub(crate) struct TaskReplacement {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    /// `None` keeps the stored status.
    pub status: Option<TaskStatus>,
}

/// A user ready to be inserted. The password is still plaintext.
pub(crate) struct UserDraft {
    pub name: String,
    pub email: Email,
    pub password: String,
}

/// A validated user replacement. `None` fields keep their stored value.
pub(crate) struct UserReplacement {
    pub id: UserId,
    pub name: Option<String>,
    pub email: Option<Email>,
    pub password: Option<String>,
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn parse_email(value: String) -> TaskStoreResult<Email> {
    Email::parse(value).map_err(|e| TaskStoreError::validation(e.to_string()))
}

pub(crate) fn prepare_new_task(task: NewTask) -> TaskStoreResult<TaskDraft> {
    if task.title.is_empty() {
        return Err(TaskStoreError::validation("task title is empty"));
    }

    Ok(TaskDraft {
        title: task.title,
        description: task.description,
        status: TaskStatus::parse(&task.status).unwrap_or_default(),
    })
}

pub(crate) fn prepare_task_update(task: TaskUpdate) -> TaskStoreResult<TaskReplacement> {
    if task.title.is_empty() {
        return Err(TaskStoreError::validation("task title is empty"));
    }

    Ok(TaskReplacement {
        id: task.id,
        title: task.title,
        description: task.description,
        status: TaskStatus::parse(&task.status),
    })
}

pub(crate) fn prepare_new_user(user: NewUser) -> TaskStoreResult<UserDraft> {
    if user.name.is_empty() {
        return Err(TaskStoreError::validation("user name is empty"));
    }
    if user.password.is_empty() {
        return Err(TaskStoreError::validation("password is empty"));
    }

    Ok(UserDraft {
        name: user.name,
        email: parse_email(user.email)?,
        password: user.password,
    })
}

pub(crate) fn prepare_user_update(user: UserUpdate) -> TaskStoreResult<UserReplacement> {
    let email = match non_empty(user.email) {
        Some(email) => Some(parse_email(email)?),
        None => None,
    };

    Ok(UserReplacement {
        id: user.id,
        name: non_empty(user.name),
        email,
        password: non_empty(user.password),
    })
}

/// Hashes a password on the blocking thread pool.
pub(crate) async fn hash_password(
    hasher: &PasswordHasher,
    password: String,
) -> TaskStoreResult<String> {
    let hasher = hasher.clone();
    let hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))??;
    Ok(hash)
}
