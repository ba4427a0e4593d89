use crate::error::MissingPolicy;
use crate::roster::{HallStaffing, Roster, WorkerType, hall_staffing};
use crate::sample;
use crate::schedule::WorkerSchedule;
use crate::schedule_store::ScheduleStore;
use crate::task::TaskStatus;
use crate::task_store::{TaskCollections, TaskStore};
use crate::time_window::round_hundredths;
use chrono::{Datelike, Local, Weekday};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Everything a running board owns: one task store, one schedule store and
/// the worker directory they refer to.
#[derive(Debug, Default)]
pub struct Board {
    pub tasks: TaskStore,
    pub schedules: ScheduleStore,
    pub roster: Roster,
}

/// Serializable copy of both stores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub tasks: TaskCollections,
    pub schedules: Vec<WorkerSchedule>,
}

/// Admin dashboard figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardOverview {
    pub student_workers: usize,
    pub gmw_workers: usize,
    pub scheduled_today: usize,
    pub total_hours_picked: f64,
    pub total_hours_completed: f64,
    pub available_tasks: usize,
    pub in_progress_tasks: usize,
    pub completed_tasks: usize,
}

impl Board {
    pub fn new(policy: MissingPolicy) -> Self {
        Self {
            tasks: TaskStore::with_policy(policy),
            schedules: ScheduleStore::with_policy(policy),
            roster: Roster::default(),
        }
    }

    pub fn with_roster(policy: MissingPolicy, roster: Roster) -> Self {
        let board = Self {
            roster,
            ..Self::new(policy)
        };
        for worker in board.roster.workers() {
            board.schedules.register_worker(&worker.id);
        }
        board
    }

    /// A board pre-filled with the demo roster, weekly schedules and open
    /// tasks.
    pub fn with_sample_data(policy: MissingPolicy) -> Self {
        let board = Self::with_roster(policy, sample::sample_roster());
        sample::seed(&board);
        info!(
            workers = board.roster.len(),
            tasks = board.tasks.available_tasks().len(),
            "sample data loaded"
        );
        board
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            tasks: self.tasks.snapshot(),
            schedules: self.schedules.schedules(),
        }
    }

    pub fn restore(&self, snapshot: BoardSnapshot) {
        self.tasks.restore(snapshot.tasks);
        self.schedules.restore(snapshot.schedules);
    }

    pub fn hall_staffing(&self, day: Weekday) -> Vec<HallStaffing> {
        hall_staffing(&self.roster, &self.schedules, day)
    }

    pub fn hall_staffing_today(&self) -> Vec<HallStaffing> {
        self.hall_staffing(Local::now().weekday())
    }

    pub fn overview(&self) -> BoardOverview {
        let today = Local::now().weekday();
        let schedules = self.schedules.schedules();
        let tasks = self.tasks.snapshot();
        let count_type = |kind: WorkerType| {
            self.roster
                .workers()
                .iter()
                .filter(|w| w.worker_type == kind)
                .count()
        };
        BoardOverview {
            student_workers: count_type(WorkerType::Student),
            gmw_workers: count_type(WorkerType::Gmw),
            scheduled_today: schedules.iter().filter(|s| s.works_on(today)).count(),
            total_hours_picked: round_hundredths(
                schedules.iter().map(WorkerSchedule::hours_picked).sum(),
            ),
            total_hours_completed: round_hundredths(
                schedules.iter().map(WorkerSchedule::hours_completed).sum(),
            ),
            available_tasks: tasks.available.len(),
            in_progress_tasks: tasks
                .assigned
                .iter()
                .filter(|t| t.status == TaskStatus::InProgress)
                .count(),
            completed_tasks: tasks.assigned.iter().filter(|t| t.is_completed()).count(),
        }
    }
}
