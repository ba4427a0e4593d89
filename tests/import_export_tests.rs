use shift_board::{
    Board, BoardSnapshot, MissingPolicy, PersistenceError, TaskStatus, export_schedules_to_csv,
    export_tasks_to_csv, load_board_from_json, load_tasks_from_csv, save_board_to_json,
};
use std::fs;
use tempfile::NamedTempFile;

fn build_sample_board() -> Board {
    let board = Board::with_sample_data(MissingPolicy::Report);
    board.tasks.pick_task("avail-1", "1", "Avery Lindqvist").unwrap();
    board.tasks.pick_task("avail-2", "3", "Mateo Ruiz").unwrap();
    board.tasks.complete_task("avail-2").unwrap();
    board
}

#[test]
fn json_round_trip_preserves_the_board() {
    let board = build_sample_board();
    let tmp = NamedTempFile::new().expect("create temp file");

    save_board_to_json(&board, tmp.path()).expect("save json");
    let loaded = load_board_from_json(tmp.path()).expect("load json");
    assert_eq!(loaded, board.snapshot());

    let restored = Board::new(MissingPolicy::Report);
    restored.restore(loaded);
    assert_eq!(restored.tasks.completed_tasks()[0].id, "avail-2");
    assert_eq!(
        restored.schedules.worker_schedule("6").unwrap().hours_picked(),
        8.0
    );
}

#[test]
fn csv_round_trip_splits_tasks_by_status() {
    let board = build_sample_board();
    let tmp = NamedTempFile::new().expect("create temp file");

    export_tasks_to_csv(&board, tmp.path()).expect("export csv");
    let collections = load_tasks_from_csv(tmp.path()).expect("load csv");

    assert_eq!(collections.available.len(), 2);
    assert_eq!(collections.assigned.len(), 2);
    let done = collections
        .assigned
        .iter()
        .find(|t| t.id == "avail-2")
        .unwrap();
    assert_eq!(done.status, TaskStatus::Completed);
    assert_eq!(done.assigned_to_name.as_deref(), Some("Mateo Ruiz"));
    assert!(done.completed_at.is_some());
    assert!(collections.available.iter().all(|t| t.assigned_to.is_none()));
}

#[test]
fn schedule_export_writes_seven_rows_per_worker() {
    let board = build_sample_board();
    let tmp = NamedTempFile::new().expect("create temp file");

    export_schedules_to_csv(&board, tmp.path()).expect("export schedules");
    let text = fs::read_to_string(tmp.path()).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert!(lines[0].starts_with("worker_id,day,start_time,end_time,hours"));
    assert_eq!(lines.len(), 1 + 7 * board.roster.len());
    assert!(text.contains("6,Saturday,10:00 PM,2:00 AM,4.0"));
}

#[test]
fn loading_rejects_inconsistent_snapshots() {
    let board = build_sample_board();
    let mut snapshot = board.snapshot();
    let mut duplicate = snapshot.tasks.assigned[0].clone();
    duplicate.status = TaskStatus::Available;
    duplicate.assigned_to = None;
    duplicate.assigned_to_name = None;
    snapshot.tasks.available.push(duplicate);

    let tmp = NamedTempFile::new().expect("create temp file");
    fs::write(tmp.path(), serde_json::to_vec(&snapshot).unwrap()).unwrap();
    let err = load_board_from_json(tmp.path()).unwrap_err();
    assert!(matches!(err, PersistenceError::InvalidData(_)));
}

#[test]
fn loading_rejects_completed_tasks_without_timestamp() {
    let board = build_sample_board();
    let mut snapshot: BoardSnapshot = board.snapshot();
    for task in &mut snapshot.tasks.assigned {
        task.completed_at = None;
    }

    let tmp = NamedTempFile::new().expect("create temp file");
    fs::write(tmp.path(), serde_json::to_vec(&snapshot).unwrap()).unwrap();
    assert!(load_board_from_json(tmp.path()).is_err());
}

#[test]
fn missing_file_is_an_io_error() {
    let err = load_board_from_json("/definitely/not/here.json").unwrap_err();
    assert!(matches!(err, PersistenceError::Io(_)));
}
