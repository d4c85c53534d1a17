//! User-related entity definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Email;

/// Backend-assigned user identifier.
pub type UserId = i64;

/// A user account as seen by callers.
///
/// This projection never carries credential material; see
/// [`UserCredentials`] for the login lookup that does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier.
    pub id: UserId,
    /// Display name, never empty.
    pub name: String,
    /// Email address, unique among stored users.
    pub email: Email,
}

/// A user together with the stored password hash.
///
/// The hash is skipped during serialization and redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct UserCredentials {
    #[serde(flatten)]
    pub user: User,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

impl fmt::Debug for UserCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserCredentials")
            .field("user", &self.user)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}

/// Caller-supplied fields for creating a user.
///
/// `password` is plaintext; the store hashes it and never keeps it.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl NewUser {
    /// Creates a new user draft.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Full replacement of a stored user.
///
/// Empty `name`, `email` or `password` keep the stored value. A non-empty
/// `password` is rehashed.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserUpdate {
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl UserUpdate {
    /// Creates an update for user `id` that keeps every stored field.
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    /// Replaces the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Replaces the email address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Replaces the password.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }
}

impl fmt::Debug for UserUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserUpdate")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
