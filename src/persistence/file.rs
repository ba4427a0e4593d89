use super::{PersistenceError, PersistenceResult};
use crate::board::{Board, BoardSnapshot};
use crate::schedule::WorkerSchedule;
use crate::task::{Priority, Task, TaskStatus};
use crate::task_store::TaskCollections;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

pub fn save_board_to_json<P: AsRef<Path>>(board: &Board, path: P) -> PersistenceResult<()> {
    let snapshot = board.snapshot();
    super::validate_snapshot(&snapshot)?;
    let file = File::create(path.as_ref())?;
    serde_json::to_writer_pretty(file, &snapshot)?;
    info!(path = %path.as_ref().display(), tasks = snapshot.tasks.len(), "board saved");
    Ok(())
}

pub fn load_board_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<BoardSnapshot> {
    let file = File::open(path)?;
    let snapshot: BoardSnapshot = serde_json::from_reader(file)?;
    super::validate_snapshot(&snapshot)?;
    Ok(snapshot)
}

#[derive(Default, Serialize, Deserialize)]
struct TaskCsvRecord {
    id: String,
    title: String,
    description: String,
    location: String,
    priority: String,
    status: String,
    assigned_to: String,
    assigned_to_name: String,
    assigned_by_name: String,
    created_at: String,
    due_at: String,
    completed_at: String,
}

impl From<&Task> for TaskCsvRecord {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            location: task.location.clone(),
            priority: task.priority.as_str().to_string(),
            status: task.status.as_str().to_string(),
            assigned_to: task.assigned_to.clone().unwrap_or_default(),
            assigned_to_name: task.assigned_to_name.clone().unwrap_or_default(),
            assigned_by_name: task.assigned_by_name.clone(),
            created_at: task.created_at.to_rfc3339(),
            due_at: task.due_at.to_rfc3339(),
            completed_at: format_timestamp(task.completed_at),
        }
    }
}

impl TaskCsvRecord {
    fn into_task(self) -> PersistenceResult<Task> {
        let priority = Priority::from_str(&self.priority).map_err(PersistenceError::InvalidData)?;
        let status = TaskStatus::from_str(&self.status).map_err(PersistenceError::InvalidData)?;
        let created_at = parse_timestamp(&self.created_at)?.ok_or_else(|| {
            PersistenceError::InvalidData(format!("task {} has no created_at", self.id))
        })?;
        let due_at = parse_timestamp(&self.due_at)?.ok_or_else(|| {
            PersistenceError::InvalidData(format!("task {} has no due_at", self.id))
        })?;
        Ok(Task {
            completed_at: parse_timestamp(&self.completed_at)?,
            id: self.id,
            title: self.title,
            description: parse_string_option(self.description),
            location: self.location,
            priority,
            status,
            assigned_to: parse_string_option(self.assigned_to),
            assigned_to_name: parse_string_option(self.assigned_to_name),
            assigned_by_name: self.assigned_by_name,
            created_at,
            due_at,
        })
    }
}

/// Write every task, available pool first, one row per task.
pub fn export_tasks_to_csv<P: AsRef<Path>>(board: &Board, path: P) -> PersistenceResult<()> {
    let collections = board.tasks.snapshot();
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for task in collections.iter() {
        writer.serialize(TaskCsvRecord::from(task))?;
    }
    writer.flush()?;
    Ok(())
}

/// Read tasks written by [`export_tasks_to_csv`], splitting them back into
/// the pool and the assigned set by status.
pub fn load_tasks_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<TaskCollections> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut collections = TaskCollections::default();
    for record in reader.deserialize::<TaskCsvRecord>() {
        let task = record?.into_task()?;
        if task.status.is_assigned() {
            collections.assigned.push(task);
        } else {
            collections.available.push(task);
        }
    }
    super::validate_snapshot(&BoardSnapshot {
        tasks: collections.clone(),
        schedules: Vec::new(),
    })?;
    Ok(collections)
}

#[derive(Serialize)]
struct ScheduleCsvRecord<'a> {
    worker_id: &'a str,
    day: &'static str,
    start_time: &'a str,
    end_time: &'a str,
    hours: f64,
    week_hours_picked: f64,
    week_hours_completed: f64,
}

/// Timesheet export: seven rows per worker, with the weekly totals repeated
/// on each row.
pub fn export_schedules_to_csv<P: AsRef<Path>>(board: &Board, path: P) -> PersistenceResult<()> {
    let schedules = board.schedules.schedules();
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for schedule in &schedules {
        write_schedule_rows(&mut writer, schedule)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_schedule_rows<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    schedule: &WorkerSchedule,
) -> PersistenceResult<()> {
    for day in schedule.days() {
        writer.serialize(ScheduleCsvRecord {
            worker_id: schedule.worker_id(),
            day: day.day_name(),
            start_time: day.start_time().unwrap_or_default(),
            end_time: day.end_time().unwrap_or_default(),
            hours: day.hours(),
            week_hours_picked: schedule.hours_picked(),
            week_hours_completed: schedule.hours_completed(),
        })?;
    }
    Ok(())
}

fn format_timestamp(value: Option<DateTime<Utc>>) -> String {
    value.map(|v| v.to_rfc3339()).unwrap_or_default()
}

fn parse_timestamp(input: &str) -> PersistenceResult<Option<DateTime<Utc>>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    DateTime::parse_from_rfc3339(input.trim())
        .map(|ts| Some(ts.with_timezone(&Utc)))
        .map_err(|e| PersistenceError::InvalidData(format!("invalid timestamp '{input}': {e}")))
}

fn parse_string_option(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
