//! Task store error types.

use auth::AuthError;
use thiserror::Error;

/// Coarse classification of a [`TaskStoreError`].
///
/// Every backend maps its failures onto the same four kinds, so callers can
/// branch on the kind without knowing which backend is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No record exists at the given identifier.
    NotFound,
    /// The write would give two users the same email.
    DuplicateEmail,
    /// A required field is missing or malformed.
    Validation,
    /// I/O, connectivity, hashing or stored-data failure.
    Backend,
}

/// Errors that can occur during task store operations.
#[derive(Debug, Error)]
pub enum TaskStoreError {
    /// Entity not found.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Email already used by another user.
    #[error("Email already exists: {email}")]
    DuplicateEmail { email: String },

    /// Malformed required field.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Password hashing error.
    #[error("Credential error: {0}")]
    Credential(#[from] AuthError),

    /// A stored row could not be mapped back into an entity.
    #[error("Corrupt record: {0}")]
    CorruptRecord(String),
}

impl TaskStoreError {
    /// Creates a not found error.
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Creates a duplicate email error.
    pub fn duplicate_email(email: impl Into<String>) -> Self {
        Self::DuplicateEmail {
            email: email.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::DuplicateEmail { .. } => ErrorKind::DuplicateEmail,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Database(_) | Self::Credential(_) | Self::CorruptRecord(_) => ErrorKind::Backend,
        }
    }

    /// Translates a database error raised by a write to the users table.
    ///
    /// A unique-constraint violation is the authoritative duplicate signal
    /// and becomes [`TaskStoreError::DuplicateEmail`]; anything else stays a
    /// database error.
    pub(crate) fn from_user_write(err: sqlx::Error, email: &str) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                Self::duplicate_email(email)
            }
            _ => Self::Database(err),
        }
    }
}

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;
