use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("task {0} not found")]
    TaskNotFound(String),

    #[error("no schedule recorded for worker {0}")]
    WorkerNotFound(String),

    #[error("task {task_id} {reason}")]
    Conflict { task_id: String, reason: String },

    #[error("{0}")]
    Validation(String),
}

impl StoreError {
    pub(crate) fn conflict(task_id: &str, reason: impl Into<String>) -> Self {
        StoreError::Conflict {
            task_id: task_id.to_string(),
            reason: reason.into(),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// How a store answers a command that names an unknown id or a task in the
/// wrong collection.
///
/// Under `Ignore` nothing changes, nobody is notified and the call returns
/// `Ok(None)`. `Report` surfaces the reason as a [`StoreError`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingPolicy {
    Ignore,
    #[default]
    Report,
}

impl MissingPolicy {
    pub(crate) fn apply<T>(self, err: StoreError) -> StoreResult<Option<T>> {
        match self {
            MissingPolicy::Ignore => Ok(None),
            MissingPolicy::Report => Err(err),
        }
    }
}
