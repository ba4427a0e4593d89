use chrono::{Datelike, Duration, Local, Utc};
use shift_board::{
    Board, DAYS_OF_WEEK, Hall, MissingPolicy, NewTask, Priority, RosterFilter, ScheduleDay, Task,
    WorkerSchedule, export_schedules_to_csv, export_tasks_to_csv,
    load_board_from_json, parse_time, sample, save_board_to_json,
    schedule::{day_name, parse_day},
};
use std::io::{self, Write};
use std::str::FromStr;

fn render_row<'a>(widths: &[usize], cells: impl Iterator<Item = &'a str>) -> String {
    let mut line = String::from("|");
    for (ci, cell) in cells.enumerate() {
        line.push(' ');
        line.push_str(cell);
        line.push_str(&" ".repeat(widths[ci].saturating_sub(cell.chars().count())));
        line.push_str(" |");
    }
    line
}

fn render_text_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (ci, cell) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(cell.chars().count());
        }
    }

    let mut sep = String::new();
    sep.push('+');
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(&widths, headers.iter().copied()));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in rows {
        out.push_str(&render_row(&widths, row.iter().map(String::as_str)));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn render_tasks(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "(no tasks)\n".to_string();
    }
    let rows: Vec<Vec<String>> = tasks
        .iter()
        .map(|t| {
            vec![
                t.id.clone(),
                t.title.clone(),
                t.location.clone(),
                t.priority.to_string(),
                t.status.to_string(),
                t.assigned_to_name.clone().unwrap_or_default(),
                t.due_at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
            ]
        })
        .collect();
    render_text_table(
        &["id", "title", "location", "priority", "status", "assignee", "due"],
        &rows,
    )
}

fn render_schedule(schedule: &WorkerSchedule) -> String {
    let rows: Vec<Vec<String>> = schedule
        .days()
        .iter()
        .map(|d| {
            vec![
                d.day_name().to_string(),
                display_time(d.start_time()),
                display_time(d.end_time()),
                format!("{:.2}", d.hours()),
            ]
        })
        .collect();
    let mut out = render_text_table(&["day", "start", "end", "hours"], &rows);
    out.push_str(&format!(
        "Hours picked: {:.2}  completed: {:.2}  remaining: {:.2}\n",
        schedule.hours_picked(),
        schedule.hours_completed(),
        schedule.hours_remaining()
    ));
    out
}

fn display_time(text: Option<&str>) -> String {
    match text.and_then(parse_time) {
        Some(time) => time.to_display(),
        None => text.unwrap_or_default().to_string(),
    }
}

fn print_help() {
    println!(
        "Commands:\n  help                                     Show this help\n  tasks [available|assigned|completed|today]\n                                           List tasks (default: available)\n  create <Normal|High> <due_in_hours> <title...> | <location...> [| <description...>]\n                                           Post a new task\n  task <task_id>                           Show one task\n  pick <task_id> <worker_id> <name...>     Assign a task to a worker\n  unpick <task_id>                         Return a task to the pool\n  complete <task_id>                       Mark a picked task completed\n  mine <worker_id>                         Tasks picked by a worker\n  schedule show <worker_id>                Show a worker's week\n  schedule set <worker_id> <day> <start> - <end>\n                                           Set one day's shift (e.g. 9:00 AM - 1:00 PM)\n  schedule clear <worker_id> <day>         Mark a day off\n  hours <worker_id> <value>                Report completed hours\n  roster [hall]                            List workers\n  staffing [day]                           Hall staffing for a day (default: today)\n  overview                                 Dashboard totals\n  seed                                     Load sample roster, schedules and tasks\n  save <json|csv> <path>                   Save the board (csv writes tasks)\n  export schedules <path>                  Write a timesheet CSV\n  load json <path>                         Replace the board from a JSON snapshot\n  quit|exit                                Exit"
    );
}

fn report<T>(outcome: shift_board::StoreResult<Option<T>>, done: impl FnOnce(T)) {
    match outcome {
        Ok(Some(value)) => done(value),
        Ok(None) => println!("Nothing changed."),
        Err(e) => println!("Error: {e}"),
    }
}

fn week_with(board: &Board, worker_id: &str, entry: ScheduleDay) -> Vec<ScheduleDay> {
    let current = board
        .schedules
        .worker_schedule(worker_id)
        .map(|s| s.days().to_vec())
        .unwrap_or_else(|| DAYS_OF_WEEK.into_iter().map(ScheduleDay::off).collect());
    current
        .into_iter()
        .map(|d| if d.day() == entry.day() { entry.clone() } else { d })
        .collect()
}

fn handle_schedule(board: &Board, rest: &str) {
    let mut parts = rest.split_whitespace();
    let sub = parts.next().unwrap_or("");
    let worker_id = parts.next();
    match (sub, worker_id) {
        ("show", Some(worker_id)) => match board.schedules.worker_schedule(worker_id) {
            Some(schedule) => print!("{}", render_schedule(&schedule)),
            None => println!("No schedule for worker {worker_id}."),
        },
        ("set", Some(worker_id)) => {
            let Some(day) = parts.next().and_then(parse_day) else {
                println!("Invalid day");
                return;
            };
            let range = parts.collect::<Vec<_>>().join(" ");
            let Some((start, end)) = range.split_once(" - ") else {
                println!("Usage: schedule set <worker_id> <day> <start> - <end>");
                return;
            };
            if parse_time(start).is_none() || parse_time(end).is_none() {
                println!("Invalid time (use HH:MM or H:MM AM/PM)");
                return;
            }
            let entry = ScheduleDay::new(day, Some(start), Some(end));
            let week = week_with(board, worker_id, entry);
            match board.schedules.update_schedule(worker_id, week) {
                Ok(schedule) => {
                    println!("Schedule updated for worker {worker_id}.");
                    print!("{}", render_schedule(&schedule));
                }
                Err(e) => println!("Error: {e}"),
            }
        }
        ("clear", Some(worker_id)) => {
            let Some(day) = parts.next().and_then(parse_day) else {
                println!("Invalid day");
                return;
            };
            let week = week_with(board, worker_id, ScheduleDay::off(day));
            match board.schedules.update_schedule(worker_id, week) {
                Ok(schedule) => {
                    println!("{} cleared for worker {worker_id}.", day_name(day));
                    print!("{}", render_schedule(&schedule));
                }
                Err(e) => println!("Error: {e}"),
            }
        }
        _ => println!("Usage: schedule <show|set|clear> <worker_id> ..."),
    }
}

fn handle_create(board: &Board, rest: &str) {
    let usage =
        "Usage: create <Normal|High> <due_in_hours> <title...> | <location...> [| <description...>]";
    let mut parts = rest.splitn(3, ' ');
    let (Some(priority), Some(due), Some(text)) = (parts.next(), parts.next(), parts.next()) else {
        println!("{usage}");
        return;
    };
    let priority = match Priority::from_str(priority) {
        Ok(p) => p,
        Err(e) => {
            println!("Error: {e}");
            return;
        }
    };
    let due_in_hours: i64 = match due.parse() {
        Ok(v) => v,
        Err(_) => {
            println!("Invalid due_in_hours");
            return;
        }
    };
    let Some(due_at) =
        Duration::try_hours(due_in_hours).and_then(|d| Utc::now().checked_add_signed(d))
    else {
        println!("Invalid due_in_hours");
        return;
    };
    let mut sections = text.splitn(3, '|').map(str::trim);
    let (Some(title), Some(location)) = (sections.next(), sections.next()) else {
        println!("{usage}");
        return;
    };
    let mut fields = NewTask::new(title, location, due_at).with_priority(priority);
    if let Some(description) = sections.next().filter(|d| !d.is_empty()) {
        fields = fields.with_description(description);
    }
    if let Err(e) = fields.validate() {
        println!("Error: {e}");
        return;
    }
    let task = board.tasks.create_task(fields);
    println!("Created task {}.", task.id);
}

fn render_task_details(task: &Task) -> String {
    let mut out = format!("{} [{}]\n", task.title, task.id);
    out.push_str(&format!("  Location : {}\n", task.location));
    out.push_str(&format!("  Priority : {}\n", task.priority));
    out.push_str(&format!("  Status   : {}\n", task.status));
    out.push_str(&format!("  Posted by: {}\n", task.assigned_by_name));
    if let Some(name) = &task.assigned_to_name {
        out.push_str(&format!("  Assignee : {name}\n"));
    }
    out.push_str(&format!(
        "  Due      : {}\n",
        task.due_at.with_timezone(&Local).format("%Y-%m-%d %H:%M")
    ));
    if let Some(description) = &task.description {
        out.push_str(&format!("  {description}\n"));
    }
    out
}

fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("SHIFT_BOARD_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let mut board = Board::new(MissingPolicy::Report);

    println!("Shift Board (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let (cmd, rest) = input.split_once(' ').unwrap_or((input, ""));
        let rest = rest.trim();
        let mut parts = rest.split_whitespace();

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "tasks" => {
                let tasks = match parts.next().unwrap_or("available") {
                    "available" => board.tasks.available_tasks(),
                    "assigned" => board.tasks.assigned_tasks(),
                    "completed" => board.tasks.completed_tasks(),
                    "today" => board.tasks.tasks_due_today(),
                    other => {
                        println!("Unknown listing '{other}'");
                        continue;
                    }
                };
                print!("{}", render_tasks(&tasks));
            }
            "create" => handle_create(&board, rest),
            "pick" => {
                let task_id = parts.next();
                let worker_id = parts.next();
                let name = parts.collect::<Vec<_>>().join(" ");
                match (task_id, worker_id) {
                    (Some(task_id), Some(worker_id)) if !name.is_empty() => {
                        report(board.tasks.pick_task(task_id, worker_id, &name), |task| {
                            println!("Task {} picked by {}.", task.id, name)
                        })
                    }
                    _ => println!("Usage: pick <task_id> <worker_id> <name...>"),
                }
            }
            "unpick" => match parts.next() {
                Some(task_id) => report(board.tasks.unpick_task(task_id), |task| {
                    println!("Task {} returned to the pool.", task.id)
                }),
                None => println!("Usage: unpick <task_id>"),
            },
            "complete" => match parts.next() {
                Some(task_id) => report(board.tasks.complete_task(task_id), |task| {
                    println!("Task {} completed.", task.id)
                }),
                None => println!("Usage: complete <task_id>"),
            },
            "task" => match parts.next() {
                Some(task_id) => match board.tasks.find_task(task_id) {
                    Some(task) => print!("{}", render_task_details(&task)),
                    None => println!("Error: task {task_id} not found"),
                },
                None => println!("Usage: task <task_id>"),
            },
            "mine" => match parts.next() {
                Some(worker_id) => {
                    print!("{}", render_tasks(&board.tasks.tasks_by_worker(worker_id)))
                }
                None => println!("Usage: mine <worker_id>"),
            },
            "schedule" => handle_schedule(&board, rest),
            "hours" => {
                let worker_id = parts.next();
                let value = parts.next().map(str::parse::<f64>);
                match (worker_id, value) {
                    (Some(worker_id), Some(Ok(hours))) => {
                        report(board.schedules.update_hours_completed(worker_id, hours), |s| {
                            println!(
                                "Worker {} completed {:.2} of {:.2} hours.",
                                s.worker_id(),
                                s.hours_completed(),
                                s.hours_picked()
                            )
                        })
                    }
                    (Some(_), Some(Err(_))) => println!("Invalid hours"),
                    _ => println!("Usage: hours <worker_id> <value>"),
                }
            }
            "roster" => {
                let hall = match parts.next() {
                    Some(raw) => match Hall::ALL
                        .into_iter()
                        .find(|h| h.as_str().replace(' ', "").eq_ignore_ascii_case(raw))
                    {
                        Some(hall) => Some(hall),
                        None => {
                            println!("Unknown hall '{raw}'");
                            continue;
                        }
                    },
                    None => None,
                };
                let filter = RosterFilter {
                    hall,
                    ..RosterFilter::default()
                };
                let rows: Vec<Vec<String>> = board
                    .roster
                    .filter(&filter)
                    .into_iter()
                    .map(|w| {
                        vec![
                            w.id.clone(),
                            w.name.clone(),
                            format!("{:?}", w.worker_type),
                            format!("{} {}", w.hall, w.sub_hall),
                        ]
                    })
                    .collect();
                print!("{}", render_text_table(&["id", "name", "type", "hall"], &rows));
            }
            "staffing" => {
                let (day, staffing) = match parts.next() {
                    Some(raw) => match parse_day(raw) {
                        Some(day) => (day, board.hall_staffing(day)),
                        None => {
                            println!("Invalid day");
                            continue;
                        }
                    },
                    None => (Local::now().weekday(), board.hall_staffing_today()),
                };
                let rows: Vec<Vec<String>> = staffing
                    .into_iter()
                    .map(|s| {
                        vec![
                            s.hall.to_string(),
                            s.total_workers.to_string(),
                            s.scheduled_workers.to_string(),
                            format!("{:.2}", s.scheduled_hours),
                        ]
                    })
                    .collect();
                println!("Staffing for {}:", day_name(day));
                print!(
                    "{}",
                    render_text_table(&["hall", "workers", "scheduled", "hours"], &rows)
                );
            }
            "overview" => {
                let o = board.overview();
                println!("Student workers    : {}", o.student_workers);
                println!("GMW workers        : {}", o.gmw_workers);
                println!("Scheduled today    : {}", o.scheduled_today);
                println!("Hours picked       : {:.2}", o.total_hours_picked);
                println!("Hours completed    : {:.2}", o.total_hours_completed);
                println!("Available tasks    : {}", o.available_tasks);
                println!("In progress tasks  : {}", o.in_progress_tasks);
                println!("Completed tasks    : {}", o.completed_tasks);
            }
            "seed" => {
                if board.roster.is_empty() {
                    board.roster = sample::sample_roster();
                }
                sample::seed(&board);
                println!(
                    "Sample data loaded ({} workers, {} open tasks).",
                    board.roster.len(),
                    board.tasks.available_tasks().len()
                );
            }
            "save" => {
                let format = parts.next();
                let path = parts.next();
                let result = match (format, path) {
                    (Some("json"), Some(path)) => save_board_to_json(&board, path),
                    (Some("csv"), Some(path)) => export_tasks_to_csv(&board, path),
                    _ => {
                        println!("Usage: save <json|csv> <path>");
                        continue;
                    }
                };
                match result {
                    Ok(()) => println!("Board saved to {}", path.unwrap_or_default()),
                    Err(e) => println!("Save error: {e}"),
                }
            }
            "export" => match (parts.next(), parts.next()) {
                (Some("schedules"), Some(path)) => match export_schedules_to_csv(&board, path) {
                    Ok(()) => println!("Timesheet written to {path}"),
                    Err(e) => println!("Export error: {e}"),
                },
                _ => println!("Usage: export schedules <path>"),
            },
            "load" => match (parts.next(), parts.next()) {
                (Some("json"), Some(path)) => match load_board_from_json(path) {
                    Ok(snapshot) => {
                        board.restore(snapshot);
                        println!("Board loaded from {path}");
                    }
                    Err(e) => println!("Load error: {e}"),
                },
                _ => println!("Usage: load json <path>"),
            },
            _ => println!("Unknown command. Type 'help'."),
        }
    }
}
