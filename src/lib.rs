pub mod board;
pub mod config;
pub mod error;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod notify;
pub mod persistence;
pub mod roster;
pub mod sample;
pub mod schedule;
pub mod schedule_store;
pub mod task;
pub mod task_store;
pub mod time_window;

pub use board::{Board, BoardOverview, BoardSnapshot};
pub use config::{BoardConfig, ConfigError};
pub use error::{MissingPolicy, StoreError, StoreResult};
pub use notify::{ChangeNotifier, Subscription};
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteBoardRepository;
pub use persistence::{
    BoardRepository, PersistenceError, export_schedules_to_csv, export_tasks_to_csv,
    load_board_from_json, load_tasks_from_csv, save_board_to_json, validate_snapshot,
};
pub use roster::{Hall, HallStaffing, Role, Roster, RosterFilter, Worker, WorkerType};
pub use schedule::{DAYS_OF_WEEK, ScheduleDay, WorkerSchedule};
pub use schedule_store::ScheduleStore;
pub use task::{DisplayStatus, NewTask, Priority, Task, TaskStatus};
pub use task_store::{TaskCollections, TaskStore};
pub use time_window::{
    TimeOfDay, compute_hours, compute_range_hours, format_for_display, normalize_to_24h,
    parse_time,
};
