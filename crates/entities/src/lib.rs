//! Core entity definitions for the task manager.
//!
//! This crate defines the records persisted by every storage backend (tasks
//! and user accounts), the input types callers hand to the store, and the
//! pure validation predicates shared by the store and its callers.

mod email;
mod task;
mod user;

pub use email::*;
pub use task::*;
pub use user::*;
