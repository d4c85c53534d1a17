//! Credential error types.

use thiserror::Error;

/// Errors that can occur while deriving password hashes.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Hash derivation failed.
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    /// Hashing cost parameters were rejected.
    #[error("Invalid hashing parameters: {0}")]
    InvalidParams(String),
}

impl From<argon2::password_hash::Error> for AuthError {
    fn from(e: argon2::password_hash::Error) -> Self {
        AuthError::Hashing(e.to_string())
    }
}

/// Result type for credential operations.
pub type AuthResult<T> = Result<T, AuthError>;
