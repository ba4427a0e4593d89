use chrono::Weekday;
use shift_board::{MissingPolicy, ScheduleDay, ScheduleStore, StoreError, WorkerSchedule};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn shift(day: Weekday, start: &str, end: &str) -> ScheduleDay {
    ScheduleDay::new(day, Some(start), Some(end))
}

#[test]
fn days_of_week_start_on_monday() {
    let days = ScheduleStore::days_of_week();
    assert_eq!(days.len(), 7);
    assert_eq!(days[0], Weekday::Mon);
    assert_eq!(days[6], Weekday::Sun);
}

#[test]
fn update_schedule_totals_the_week() {
    let store = ScheduleStore::new();
    let record = store
        .update_schedule("w1", vec![shift(Weekday::Mon, "9:00 AM", "1:00 PM")])
        .unwrap();

    assert_eq!(record.hours_picked(), 4.0);
    assert_eq!(record.hours_completed(), 0.0);
    assert_eq!(record.days().len(), 7);
    assert_eq!(record.day(Weekday::Mon).hours(), 4.0);
    assert!(!record.works_on(Weekday::Tue));
    assert_eq!(store.worker_schedule("w1"), Some(record));
}

#[test]
fn omitted_days_become_days_off() {
    let store = ScheduleStore::new();
    store
        .update_schedule(
            "w1",
            vec![
                shift(Weekday::Mon, "09:00", "17:00"),
                shift(Weekday::Tue, "09:00", "17:00"),
            ],
        )
        .unwrap();
    let record = store
        .update_schedule("w1", vec![shift(Weekday::Wed, "10:00", "12:00")])
        .unwrap();

    assert!(!record.works_on(Weekday::Mon));
    assert!(!record.works_on(Weekday::Tue));
    assert_eq!(record.hours_picked(), 2.0);
    let order: Vec<_> = record.days().iter().map(ScheduleDay::day).collect();
    assert_eq!(order, ScheduleStore::days_of_week().to_vec());
}

#[test]
fn duplicate_days_are_rejected() {
    let store = ScheduleStore::new();
    let result = store.update_schedule(
        "w1",
        vec![
            shift(Weekday::Mon, "09:00", "10:00"),
            shift(Weekday::Mon, "11:00", "12:00"),
        ],
    );
    assert!(matches!(result, Err(StoreError::Validation(_))));
    assert!(store.worker_schedule("w1").is_none());
}

#[test]
fn replacing_the_week_keeps_completed_hours() {
    let store = ScheduleStore::new();
    store
        .update_schedule("w1", vec![shift(Weekday::Fri, "2:00 PM", "6:00 PM")])
        .unwrap();
    store.update_hours_completed("w1", 3.5).unwrap();

    let record = store
        .update_schedule("w1", vec![shift(Weekday::Sat, "10:00 PM", "2:00 AM")])
        .unwrap();
    assert_eq!(record.hours_completed(), 3.5);
    assert_eq!(record.hours_picked(), 4.0);
    assert_eq!(record.hours_remaining(), 0.5);
}

#[test]
fn blank_times_count_as_zero_hours() {
    let day = ScheduleDay::new(Weekday::Thu, Some(""), Some("17:00"));
    assert_eq!(day.hours(), 0.0);
    assert!(!day.is_scheduled());
    assert_eq!(day.start_time(), None);

    let mut day = ScheduleDay::off(Weekday::Thu);
    day.set_start_time(Some("08:00"));
    day.set_end_time(Some("12:30"));
    assert_eq!(day.hours(), 4.5);
}

#[test]
fn unknown_worker_hours_follow_the_policy() {
    let strict = ScheduleStore::with_policy(MissingPolicy::Report);
    assert!(matches!(
        strict.update_hours_completed("ghost", 2.0),
        Err(StoreError::WorkerNotFound(_))
    ));
    assert!(strict.worker_schedule("ghost").is_none());

    let lenient = ScheduleStore::with_policy(MissingPolicy::Ignore);
    assert_eq!(lenient.update_hours_completed("ghost", 2.0).unwrap(), None);
    assert!(lenient.schedules().is_empty());
}

#[test]
fn negative_hours_are_invalid() {
    let store = ScheduleStore::new();
    store.register_worker("w1");
    assert!(matches!(
        store.update_hours_completed("w1", -1.0),
        Err(StoreError::Validation(_))
    ));
    assert!(matches!(
        store.update_hours_completed("w1", f64::NAN),
        Err(StoreError::Validation(_))
    ));
}

#[test]
fn register_worker_creates_an_empty_week_once() {
    let store = ScheduleStore::new();
    assert!(store.register_worker("w1"));
    store
        .update_schedule("w1", vec![shift(Weekday::Mon, "09:00", "12:00")])
        .unwrap();
    assert!(!store.register_worker("w1"));
    assert_eq!(store.worker_schedule("w1").unwrap().hours_picked(), 3.0);
}

#[test]
fn reads_never_create_records_or_notify() {
    let store = ScheduleStore::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    store.subscribe(move || {
        seen.fetch_add(1, Ordering::SeqCst);
    });

    assert!(store.worker_schedule("w1").is_none());
    assert!(store.schedules().is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    store
        .update_schedule("w1", vec![shift(Weekday::Mon, "09:00", "12:00")])
        .unwrap();
    store.update_hours_completed("w1", 1.0).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn schedules_round_trip_through_json_and_validate_length() {
    let store = ScheduleStore::new();
    let record = store
        .update_schedule("w1", vec![shift(Weekday::Tue, "1:00 PM", "5:00 PM")])
        .unwrap();
    let json = serde_json::to_string(&record).unwrap();
    let back: WorkerSchedule = serde_json::from_str(&json).unwrap();
    assert_eq!(back, record);

    let truncated = serde_json::json!({
        "worker_id": "w2",
        "days": [{ "day": "Monday", "start_time": "09:00", "end_time": "10:00" }],
        "updated_at": "2025-01-06T09:00:00Z"
    });
    assert!(serde_json::from_value::<WorkerSchedule>(truncated).is_err());
}
