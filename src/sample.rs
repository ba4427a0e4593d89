//! Demo roster and open tasks used by `--seed` and the CLI `seed` command.

use crate::board::Board;
use crate::roster::{Hall, Roster, RosterTask, Worker, WorkerType};
use crate::schedule::{ScheduleDay, parse_day};
use crate::task::{DisplayStatus, Priority, Task, TaskStatus};
use crate::task_store::TaskCollections;
use chrono::{DateTime, Duration, Utc};
use tracing::warn;

struct SampleWorker {
    id: &'static str,
    name: &'static str,
    worker_type: WorkerType,
    hall: Hall,
    sub_hall: char,
    hours_worked: f64,
    shifts: &'static [(&'static str, &'static str)],
    tasks: &'static [(&'static str, &'static str, &'static str, Priority, DisplayStatus)],
}

const SAMPLE_WORKERS: &[SampleWorker] = &[
    SampleWorker {
        id: "1",
        name: "Avery Lindqvist",
        worker_type: WorkerType::Student,
        hall: Hall::Crawford,
        sub_hall: 'A',
        hours_worked: 12.0,
        shifts: &[
            ("Monday", "9:00 AM - 1:00 PM"),
            ("Wednesday", "9:00 AM - 1:00 PM"),
            ("Friday", "2:00 PM - 6:00 PM"),
        ],
        tasks: &[
            (
                "t1",
                "Clean Common Area",
                "Crawford Hall A - 1st Floor",
                Priority::High,
                DisplayStatus::InProgress,
            ),
            (
                "t2",
                "Restock Supplies",
                "Crawford Hall A - Supply Room",
                Priority::Normal,
                DisplayStatus::NotStarted,
            ),
        ],
    },
    SampleWorker {
        id: "2",
        name: "Noor Haddad",
        worker_type: WorkerType::Student,
        hall: Hall::Crawford,
        sub_hall: 'B',
        hours_worked: 6.0,
        shifts: &[
            ("Tuesday", "10:00 AM - 2:00 PM"),
            ("Thursday", "10:00 AM - 2:00 PM"),
        ],
        tasks: &[(
            "t3",
            "Maintenance Check",
            "Crawford Hall B - 2nd Floor",
            Priority::Normal,
            DisplayStatus::Completed,
        )],
    },
    SampleWorker {
        id: "3",
        name: "Mateo Ruiz",
        worker_type: WorkerType::Student,
        hall: Hall::McElroy,
        sub_hall: 'E',
        hours_worked: 8.0,
        shifts: &[
            ("Monday", "3:00 PM - 6:00 PM"),
            ("Wednesday", "3:00 PM - 6:00 PM"),
            ("Friday", "3:00 PM - 6:00 PM"),
        ],
        tasks: &[],
    },
    SampleWorker {
        id: "4",
        name: "Grace Okafor",
        worker_type: WorkerType::Gmw,
        hall: Hall::Preska,
        sub_hall: 'I',
        hours_worked: 32.0,
        shifts: &[
            ("Monday", "8:00 AM - 4:00 PM"),
            ("Tuesday", "8:00 AM - 4:00 PM"),
            ("Wednesday", "8:00 AM - 4:00 PM"),
            ("Thursday", "8:00 AM - 4:00 PM"),
            ("Friday", "8:00 AM - 4:00 PM"),
        ],
        tasks: &[(
            "t6",
            "Equipment Repair",
            "Preska Hall I - Maintenance Room",
            Priority::Normal,
            DisplayStatus::NotStarted,
        )],
    },
    SampleWorker {
        id: "5",
        name: "Ken Watanabe-Ross",
        worker_type: WorkerType::Gmw,
        hall: Hall::JuliaSears,
        sub_hall: 'A',
        hours_worked: 35.0,
        shifts: &[
            ("Monday", "7:00 AM - 3:00 PM"),
            ("Tuesday", "7:00 AM - 3:00 PM"),
            ("Wednesday", "7:00 AM - 3:00 PM"),
            ("Thursday", "7:00 AM - 3:00 PM"),
            ("Friday", "7:00 AM - 3:00 PM"),
        ],
        tasks: &[],
    },
    SampleWorker {
        id: "6",
        name: "Priya Raman",
        worker_type: WorkerType::Student,
        hall: Hall::Preska,
        sub_hall: 'J',
        hours_worked: 4.0,
        shifts: &[
            ("Tuesday", "1:00 PM - 5:00 PM"),
            ("Saturday", "10:00 PM - 2:00 AM"),
        ],
        tasks: &[],
    },
];

pub fn sample_roster() -> Roster {
    let workers = SAMPLE_WORKERS
        .iter()
        .map(|w| Worker {
            id: w.id.to_string(),
            name: w.name.to_string(),
            worker_type: w.worker_type,
            hall: w.hall,
            sub_hall: w.sub_hall,
            email: format!("{}@example.edu", w.name.to_lowercase().replace([' ', '-'], ".")),
            tasks: w
                .tasks
                .iter()
                .map(|(id, title, location, priority, status)| RosterTask {
                    id: id.to_string(),
                    title: title.to_string(),
                    location: location.to_string(),
                    priority: *priority,
                    status: *status,
                })
                .collect(),
        })
        .collect();
    Roster::new(workers)
}

/// Open tasks for the feed, created at staggered times before `now`.
pub fn sample_tasks(now: DateTime<Utc>) -> Vec<Task> {
    let open = [
        (
            "avail-1",
            "Clean Lobby Area",
            "Deep clean the main lobby including windows, floors, and furniture",
            "Crawford Hall - Main Lobby",
            Priority::High,
            2,
            24,
        ),
        (
            "avail-2",
            "Restock Kitchen Supplies",
            "Check and restock all kitchen supplies in common areas",
            "McElroy Hall - Kitchen",
            Priority::Normal,
            4,
            12,
        ),
        (
            "avail-3",
            "Inspect Fire Safety Equipment",
            "Monthly inspection of all fire extinguishers and alarms",
            "Preska Hall - All Floors",
            Priority::High,
            1,
            0,
        ),
        (
            "avail-4",
            "Organize Storage Room",
            "Organize and label items in the main storage room",
            "Julia Sears Hall - Storage Room",
            Priority::Normal,
            6,
            48,
        ),
    ];
    open.into_iter()
        .map(
            |(id, title, description, location, priority, age_hours, due_in_hours)| Task {
                id: id.to_string(),
                title: title.to_string(),
                description: Some(description.to_string()),
                location: location.to_string(),
                priority,
                status: TaskStatus::Available,
                assigned_to: None,
                assigned_to_name: None,
                assigned_by_name: "Admin".to_string(),
                created_at: now - Duration::hours(age_hours),
                due_at: now + Duration::hours(due_in_hours),
                completed_at: None,
            },
        )
        .collect()
}

/// Load the sample weeks and open tasks into `board`.
///
/// Open tasks are only added to an empty task board.
pub fn seed(board: &Board) {
    for worker in SAMPLE_WORKERS {
        let days: Vec<ScheduleDay> = worker
            .shifts
            .iter()
            .filter_map(|(day, range)| {
                let day = parse_day(day)?;
                let (start, end) = range.split_once(" - ")?;
                Some(ScheduleDay::new(day, Some(start), Some(end)))
            })
            .collect();
        if let Err(err) = board.schedules.update_schedule(worker.id, days) {
            warn!(worker_id = worker.id, error = %err, "sample schedule rejected");
            continue;
        }
        if let Err(err) = board
            .schedules
            .update_hours_completed(worker.id, worker.hours_worked)
        {
            warn!(worker_id = worker.id, error = %err, "sample hours rejected");
        }
    }

    if board.tasks.snapshot().is_empty() {
        board.tasks.restore(TaskCollections {
            available: sample_tasks(Utc::now()),
            assigned: Vec::new(),
        });
    }
}
