//! Task-related entity definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Backend-assigned task identifier.
pub type TaskId = i64;

/// Status of a Task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Freshly created, nobody is working on it yet.
    #[default]
    New,
    /// Work has started.
    InProgress,
    /// Work is finished.
    Completed,
}

impl TaskStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [TaskStatus; 3] = [Self::New, Self::InProgress, Self::Completed];

    /// Returns the canonical text form stored by the database backends.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    /// Parses a canonical status string.
    ///
    /// Matching is exact: `"New"` or `" new"` are not recognized.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == value)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns true if `value` is one of the canonical task statuses.
pub fn is_valid_status(value: &str) -> bool {
    TaskStatus::parse(value).is_some()
}

/// A stored task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier.
    pub id: TaskId,
    /// Task title, never empty.
    pub title: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Current status.
    pub status: TaskStatus,
}

/// Caller-supplied fields for creating a task.
///
/// `status` is kept as raw text: an empty or unrecognized value is coerced to
/// [`TaskStatus::New`] by the store rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: String,
}

impl NewTask {
    /// Creates a new task draft with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the raw status text.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }
}

/// Full replacement of a stored task.
///
/// An empty or unrecognized `status` keeps the stored status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskUpdate {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: String,
}

impl TaskUpdate {
    /// Creates an update replacing the task `id` with the given title.
    pub fn new(id: TaskId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            ..Default::default()
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the raw status text.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_is_exact() {
        assert_eq!(TaskStatus::parse("new"), Some(TaskStatus::New));
        assert_eq!(TaskStatus::parse("in_progress"), Some(TaskStatus::InProgress));
        assert_eq!(TaskStatus::parse("completed"), Some(TaskStatus::Completed));

        assert_eq!(TaskStatus::parse(""), None);
        assert_eq!(TaskStatus::parse("New"), None);
        assert_eq!(TaskStatus::parse("bogus"), None);
        assert_eq!(TaskStatus::parse("new "), None);
    }

    #[test]
    fn test_status_round_trips_through_text() {
        for status in TaskStatus::ALL {
            assert!(is_valid_status(status.as_str()));
            assert_eq!(TaskStatus::parse(&status.to_string()), Some(status));
        }
    }

    #[test]
    fn test_status_serde_matches_canonical_text() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
    }

    #[test]
    fn test_new_task_builder() {
        let task = NewTask::new("write spec")
            .with_description("first draft")
            .with_status("bogus");

        assert_eq!(task.title, "write spec");
        assert_eq!(task.description.as_deref(), Some("first draft"));
        assert_eq!(task.status, "bogus");
    }

    #[test]
    fn test_new_task_deserializes_without_status() {
        let task: NewTask = serde_json::from_str(r#"{"title":"write spec"}"#).unwrap();
        assert_eq!(task, NewTask::new("write spec"));
    }
}
