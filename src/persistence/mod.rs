use crate::board::{Board, BoardSnapshot};
use crate::task::TaskStatus;
use std::collections::HashSet;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Storage seam for a board. Saves replace everything previously stored.
pub trait BoardRepository {
    fn save_board(&self, board: &Board) -> PersistenceResult<()>;
    fn load_board(&self) -> PersistenceResult<Option<BoardSnapshot>>;
}

/// Check the invariants the stores rely on before a snapshot is loaded or
/// written.
pub fn validate_snapshot(snapshot: &BoardSnapshot) -> PersistenceResult<()> {
    let mut seen = HashSet::with_capacity(snapshot.tasks.len());
    for task in snapshot.tasks.iter() {
        if !seen.insert(task.id.as_str()) {
            return Err(PersistenceError::InvalidData(format!(
                "duplicate task id {}",
                task.id
            )));
        }
        if task.is_completed() != task.completed_at.is_some() {
            return Err(PersistenceError::InvalidData(format!(
                "task {} has status {} but completion time {:?}",
                task.id, task.status, task.completed_at
            )));
        }
    }
    for task in &snapshot.tasks.available {
        if task.status != TaskStatus::Available || task.assigned_to.is_some() {
            return Err(PersistenceError::InvalidData(format!(
                "task {} is in the available pool with status {}",
                task.id, task.status
            )));
        }
    }
    for task in &snapshot.tasks.assigned {
        if !task.status.is_assigned() || task.assigned_to.is_none() {
            return Err(PersistenceError::InvalidData(format!(
                "task {} is assigned without an assignee or with status {}",
                task.id, task.status
            )));
        }
    }

    let mut workers = HashSet::with_capacity(snapshot.schedules.len());
    for schedule in &snapshot.schedules {
        if !workers.insert(schedule.worker_id()) {
            return Err(PersistenceError::InvalidData(format!(
                "duplicate schedule for worker {}",
                schedule.worker_id()
            )));
        }
    }
    Ok(())
}

pub mod file;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::{
    export_schedules_to_csv, export_tasks_to_csv, load_board_from_json, load_tasks_from_csv,
    save_board_to_json,
};
