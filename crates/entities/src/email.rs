//! Email address value type.

use std::{fmt, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}$")
        .expect("regex pattern is valid")
});

/// Returns true if `value` is a structurally valid email address.
///
/// The address must consist of a local part, an `@`, a domain and a trailing
/// dot-delimited TLD of at least two ASCII letters.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

/// Error returned when a string is not a valid email address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid email address: {0:?}")]
pub struct EmailError(pub String);

/// A validated email address.
///
/// The only way to obtain an `Email` is through [`Email::parse`] (or serde
/// deserialization, which goes through the same check), so holding one is
/// proof that the address is well formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Parses and validates an email address.
    pub fn parse(value: impl Into<String>) -> Result<Self, EmailError> {
        let value = value.into();
        if is_valid_email(&value) {
            Ok(Self(value))
        } else {
            Err(EmailError(value))
        }
    }

    /// Returns the address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the email and returns the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for Email {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Email {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
