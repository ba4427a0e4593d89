use crate::schedule_store::ScheduleStore;
use crate::task::{DisplayStatus, Priority};
use crate::time_window::round_hundredths;
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Worker,
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "worker" => Ok(Role::Worker),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerType {
    /// Student general maintenance worker.
    Student,
    /// Full-time general maintenance worker.
    Gmw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Hall {
    Crawford,
    McElroy,
    Preska,
    #[serde(rename = "Julia Sears")]
    JuliaSears,
}

impl Hall {
    pub const ALL: [Hall; 4] = [Hall::Crawford, Hall::McElroy, Hall::Preska, Hall::JuliaSears];

    pub fn as_str(&self) -> &'static str {
        match self {
            Hall::Crawford => "Crawford",
            Hall::McElroy => "McElroy",
            Hall::Preska => "Preska",
            Hall::JuliaSears => "Julia Sears",
        }
    }

    /// Sub-hall letters belonging to this hall.
    pub fn sub_halls(&self) -> &'static [char] {
        match self {
            Hall::Crawford | Hall::JuliaSears => &['A', 'B', 'C', 'D'],
            Hall::McElroy => &['E', 'F', 'G', 'H'],
            Hall::Preska => &['I', 'J', 'K', 'L'],
        }
    }
}

impl fmt::Display for Hall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A task as listed on a roster card. Uses the display vocabulary, not the
/// live board's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterTask {
    pub id: String,
    pub title: String,
    pub location: String,
    pub priority: Priority,
    pub status: DisplayStatus,
}

/// Identity snapshot of a worker, owned by the account service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    pub id: String,
    pub name: String,
    pub worker_type: WorkerType,
    pub hall: Hall,
    pub sub_hall: char,
    pub email: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<RosterTask>,
}

#[derive(Debug, Clone, Default)]
pub struct RosterFilter {
    pub worker_type: Option<WorkerType>,
    pub hall: Option<Hall>,
    pub sub_hall: Option<char>,
    /// Case-insensitive substring of the worker's name.
    pub name: Option<String>,
}

impl RosterFilter {
    fn matches(&self, worker: &Worker) -> bool {
        if self.worker_type.is_some_and(|t| t != worker.worker_type) {
            return false;
        }
        if self.hall.is_some_and(|h| h != worker.hall) {
            return false;
        }
        if self.sub_hall.is_some_and(|s| s != worker.sub_hall) {
            return false;
        }
        match &self.name {
            Some(needle) => worker
                .name
                .to_lowercase()
                .contains(&needle.trim().to_lowercase()),
            None => true,
        }
    }
}

/// Read-only worker directory.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    workers: Vec<Worker>,
}

impl Roster {
    pub fn new(workers: Vec<Worker>) -> Self {
        Self { workers }
    }

    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    pub fn find(&self, worker_id: &str) -> Option<&Worker> {
        self.workers.iter().find(|w| w.id == worker_id)
    }

    pub fn filter(&self, filter: &RosterFilter) -> Vec<&Worker> {
        self.workers.iter().filter(|w| filter.matches(w)).collect()
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }
}

/// Staffing for one hall on one weekday.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HallStaffing {
    pub hall: Hall,
    pub total_workers: usize,
    /// Workers with a shift on the requested day.
    pub scheduled_workers: usize,
    pub scheduled_hours: f64,
}

/// Per-hall staffing for `day`, in [`Hall::ALL`] order.
///
/// A worker counts as scheduled when their record has a non-empty shift on
/// that day; workers without a record count toward the hall total only.
pub fn hall_staffing(
    roster: &Roster,
    schedules: &ScheduleStore,
    day: Weekday,
) -> Vec<HallStaffing> {
    Hall::ALL
        .into_iter()
        .map(|hall| {
            let mut staffing = HallStaffing {
                hall,
                total_workers: 0,
                scheduled_workers: 0,
                scheduled_hours: 0.0,
            };
            for worker in roster.workers().iter().filter(|w| w.hall == hall) {
                staffing.total_workers += 1;
                let Some(record) = schedules.worker_schedule(&worker.id) else {
                    continue;
                };
                let entry = record.day(day);
                if entry.is_scheduled() {
                    staffing.scheduled_workers += 1;
                    staffing.scheduled_hours += entry.hours();
                }
            }
            staffing.scheduled_hours = round_hundredths(staffing.scheduled_hours);
            staffing
        })
        .collect()
}
