//! Database row types shared by the SQL backends.

use entities::{Email, Task, TaskStatus, User, UserCredentials};
use sqlx::FromRow;

use crate::{TaskStoreError, TaskStoreResult};

/// Database row for Task
#[derive(Debug, FromRow)]
pub(crate) struct TaskRow {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
}

impl TryFrom<TaskRow> for Task {
    type Error = TaskStoreError;

    fn try_from(row: TaskRow) -> TaskStoreResult<Self> {
        let status = TaskStatus::parse(&row.status).ok_or_else(|| {
            TaskStoreError::CorruptRecord(format!(
                "task {} has unknown status {:?}",
                row.id, row.status
            ))
        })?;

        Ok(Task {
            id: row.id,
            title: row.title,
            description: row.description,
            status,
        })
    }
}

/// Database row for User, without credentials
#[derive(Debug, FromRow)]
pub(crate) struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl TryFrom<UserRow> for User {
    type Error = TaskStoreError;

    fn try_from(row: UserRow) -> TaskStoreResult<Self> {
        let email = Email::parse(row.email).map_err(|e| {
            TaskStoreError::CorruptRecord(format!("user {} has {}", row.id, e))
        })?;

        Ok(User {
            id: row.id,
            name: row.name,
            email,
        })
    }
}

/// Database row for User, including the password hash
#[derive(FromRow)]
pub(crate) struct CredentialsRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

impl TryFrom<CredentialsRow> for UserCredentials {
    type Error = TaskStoreError;

    fn try_from(row: CredentialsRow) -> TaskStoreResult<Self> {
        let user = User::try_from(UserRow {
            id: row.id,
            name: row.name,
            email: row.email,
        })?;

        Ok(UserCredentials {
            user,
            password_hash: row.password_hash,
        })
    }
}

/// Maps a batch of rows, failing on the first corrupt one.
pub(crate) fn map_rows<R, T>(rows: Vec<R>) -> TaskStoreResult<Vec<T>>
where
    T: TryFrom<R, Error = TaskStoreError>,
{
    rows.into_iter().map(T::try_from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_task_row_with_unknown_status_is_corrupt() {
        let row = TaskRow {
            id: 3,
            title: "t".to_string(),
            description: None,
            status: "bogus".to_string(),
        };
        let err = Task::try_from(row).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Backend);
    }

    #[test]
    fn test_map_rows() {
        let rows = vec![
            UserRow {
                id: 1,
                name: "Ann".to_string(),
                email: "ann@x.com".to_string(),
            },
            UserRow {
                id: 2,
                name: "Bea".to_string(),
                email: "bea@x.com".to_string(),
            },
        ];
        let users: Vec<User> = map_rows(rows).unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[1].email.as_str(), "bea@x.com");
    }
}
