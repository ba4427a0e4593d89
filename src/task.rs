use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    #[default]
    Normal,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Normal => "Normal",
            Priority::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Priority::Normal),
            "high" => Ok(Priority::High),
            other => Err(format!("unknown priority '{other}'")),
        }
    }
}

/// Lifecycle state of a live task.
///
/// `Available` tasks sit in the pool; `InProgress` and `Completed` tasks are
/// in the assigned set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    Available,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Available => "Available",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
        }
    }

    pub fn is_assigned(&self) -> bool {
        !matches!(self, TaskStatus::Available)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['_', '-'], " ").as_str() {
            "available" => Ok(TaskStatus::Available),
            "in progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            other => Err(format!("unknown task status '{other}'")),
        }
    }
}

/// Status labels used by the static roster fixture.
///
/// Kept apart from [`TaskStatus`]: `NotStarted` is a label only and no
/// store transition produces or consumes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisplayStatus {
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl DisplayStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayStatus::NotStarted => "Not Started",
            DisplayStatus::InProgress => "In Progress",
            DisplayStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub location: String,
    #[serde(default)]
    pub priority: Priority,
    pub status: TaskStatus,
    /// Worker id of the current assignee.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    /// Assignee display name captured when the task was picked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to_name: Option<String>,
    /// Display name of whoever posted the task.
    pub assigned_by_name: String,
    pub created_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    pub(crate) fn from_new(fields: NewTask, id: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: fields.title,
            description: fields.description,
            location: fields.location,
            priority: fields.priority,
            status: TaskStatus::Available,
            assigned_to: None,
            assigned_to_name: None,
            assigned_by_name: fields.assigned_by_name,
            created_at: now,
            due_at: fields.due_at,
            completed_at: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }
}

/// Fields an admin supplies when posting a task. The store assigns the id,
/// status and creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub location: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default = "default_assigned_by")]
    pub assigned_by_name: String,
    pub due_at: DateTime<Utc>,
}

fn default_assigned_by() -> String {
    "Admin".to_string()
}

impl NewTask {
    pub fn new(
        title: impl Into<String>,
        location: impl Into<String>,
        due_at: DateTime<Utc>,
    ) -> Self {
        Self {
            title: title.into(),
            description: None,
            location: location.into(),
            priority: Priority::Normal,
            assigned_by_name: default_assigned_by(),
            due_at,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn posted_by(mut self, name: impl Into<String>) -> Self {
        self.assigned_by_name = name.into();
        self
    }

    /// Required-field check applied by the request adapters before a task
    /// reaches the store.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("task title must not be empty".to_string());
        }
        if self.location.trim().is_empty() {
            return Err("task location must not be empty".to_string());
        }
        Ok(())
    }
}

/// `task-<unix millis>-<random hex>`; the random suffix keeps ids created in
/// the same millisecond distinct.
pub fn generate_task_id(now: DateTime<Utc>) -> String {
    format!("task-{}-{}", now.timestamp_millis(), Uuid::new_v4().simple())
}
