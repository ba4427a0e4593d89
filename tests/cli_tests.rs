#![cfg(feature = "cli")]

use assert_cmd::Command;
use predicates::str::contains as str_contains;
use tempfile::NamedTempFile;

#[allow(deprecated)]
fn run_cli(script: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("cli").expect("cli binary");
    cmd.write_stdin(script.to_string()).assert()
}

#[test]
fn cli_picks_and_completes_a_sample_task() {
    run_cli("seed\npick avail-1 1 Avery Lindqvist\ncomplete avail-1\ntasks completed\nquit\n")
        .success()
        .stdout(str_contains("Task avail-1 picked by Avery Lindqvist."))
        .stdout(str_contains("Task avail-1 completed."))
        .stdout(str_contains("Clean Lobby Area"));
}

#[test]
fn cli_reports_store_errors() {
    run_cli("pick missing 1 Somebody\nquit\n")
        .success()
        .stdout(str_contains("Error: task missing not found"));
}

#[test]
fn cli_sets_a_schedule_day() {
    run_cli("schedule set 7 Monday 9:00 AM - 1:00 PM\nhours 7 1.5\nquit\n")
        .success()
        .stdout(str_contains("Schedule updated for worker 7."))
        .stdout(str_contains("Hours picked: 4.00"))
        .stdout(str_contains("Worker 7 completed 1.50 of 4.00 hours."));
}

#[test]
fn cli_creates_tasks() {
    run_cli("create High 2 Replace Light Bulbs | Preska Hall - 3rd Floor\ntasks\nquit\n")
        .success()
        .stdout(str_contains("Created task task-"))
        .stdout(str_contains("Replace Light Bulbs"));
}

#[test]
fn cli_save_and_load_json_round_trip() {
    let tmp = NamedTempFile::new().expect("create temp file");
    let path = tmp.path().to_string_lossy().replace('\\', "\\\\");
    let script = format!(
        "seed\npick avail-2 3 Mateo Ruiz\nsave json {path}\nunpick avail-2\nload json {path}\nmine 3\nquit\n"
    );
    let assert = run_cli(&script).success();
    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(output.contains("Board loaded from"));
    let after_reload = output
        .split("Board loaded from")
        .last()
        .unwrap_or_default();
    assert!(
        after_reload.contains("Restock Kitchen Supplies"),
        "expected the picked task to be restored"
    );
}

#[test]
fn cli_shows_staffing_for_a_day() {
    run_cli("seed\nstaffing Saturday\nquit\n")
        .success()
        .stdout(str_contains("Staffing for Saturday:"))
        .stdout(str_contains("Preska"));
}

#[test]
fn cli_rejects_out_of_range_due_hours_and_keeps_running() {
    run_cli("create Normal 1000000000000 Mop | Lobby\ncreate Normal 9223372036854775807 Mop | Lobby\ntasks\nquit\n")
        .success()
        .stdout(str_contains("Invalid due_in_hours"))
        .stdout(str_contains("(no tasks)"));
}

#[test]
fn cli_create_accepts_a_description() {
    let tmp = NamedTempFile::new().expect("create temp file");
    let path = tmp.path().to_string_lossy().replace('\\', "\\\\");
    let script = format!(
        "create Normal 3 Wipe Windows | Crawford Hall - Lobby | Inside panes only\nsave json {path}\nquit\n"
    );
    run_cli(&script).success();

    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(tmp.path()).unwrap()).unwrap();
    let task = &saved["tasks"]["available"][0];
    assert_eq!(task["title"], "Wipe Windows");
    assert_eq!(task["location"], "Crawford Hall - Lobby");
    assert_eq!(task["description"], "Inside panes only");
}

#[test]
fn cli_task_command_shows_description() {
    run_cli("seed\ntask avail-4\nquit\n")
        .success()
        .stdout(str_contains("Organize Storage Room [avail-4]"))
        .stdout(str_contains("Organize and label items in the main storage room"))
        .stdout(str_contains("Posted by: Admin"));
}

#[test]
fn cli_tables_align_non_ascii_text() {
    let assert = run_cli("create High 2 Café Crème Spill | Résidence Hall - Étage 2\ntasks\nquit\n")
        .success();
    let output = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    let widths: Vec<usize> = output
        .lines()
        .map(|line| line.trim_start_matches("> "))
        .filter(|line| line.starts_with('|') || line.starts_with('+'))
        .map(|line| line.chars().count())
        .collect();
    assert!(widths.len() >= 4, "expected a rendered table");
    assert!(
        widths.iter().all(|w| *w == widths[0]),
        "table rows differ in width: {widths:?}"
    );
}
