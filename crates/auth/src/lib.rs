//! Credential handling for the task manager.
//!
//! This crate provides:
//! - One-way password hashing (Argon2id, random salt, PHC string output)
//! - Verification of a candidate password against a stored hash

mod error;
mod password;

pub use error::*;
pub use password::*;
