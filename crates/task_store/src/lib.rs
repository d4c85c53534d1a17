//! Task and user storage for the task manager.
//!
//! This crate provides a storage abstraction ([`TaskStore`]) over tasks and
//! user accounts with three interchangeable backends: an in-memory store, a
//! PostgreSQL store and a SQLite store. All of them enforce the same rules
//! (status defaulting, email uniqueness, password hashing) and report the same
//! [`ErrorKind`]s. [`open_store`] picks one at startup.

mod backend;
mod config;
mod error;
mod memory;
mod postgres;
mod rows;
mod rules;
mod sqlite;
mod traits;

pub use backend::*;
pub use config::*;
pub use error::*;
pub use memory::*;
pub use postgres::*;
pub use sqlite::*;
pub use traits::*;
