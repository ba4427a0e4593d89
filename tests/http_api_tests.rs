#![cfg(feature = "http_api")]

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    response::Response,
};
use shift_board::{Board, HallStaffing, MissingPolicy, Task, TaskStatus, WorkerSchedule, http_api};
use serde_json::{Value, json};
use tower::util::ServiceExt;

fn new_router(policy: MissingPolicy) -> axum::Router {
    let state = http_api::AppState::new(Board::with_sample_data(policy));
    http_api::router(state)
}

async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    role: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(role) = role {
        request = request.header(http_api::ROLE_HEADER, role);
    }
    let body = match body {
        Some(value) => {
            request = request.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&value).unwrap())
        }
        None => Body::empty(),
    };
    app.clone().oneshot(request.body(body).unwrap()).await.unwrap()
}

async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn task_lifecycle_via_http_api() {
    let app = new_router(MissingPolicy::Report);

    // Admin posts a task
    let response = send(
        &app,
        "POST",
        "/tasks",
        Some("admin"),
        Some(json!({
            "title": "Mop Stairwell",
            "location": "McElroy Hall - Stairwell B",
            "priority": "High",
            "due_at": "2030-01-01T17:00:00Z"
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Task = read_json(response).await;
    assert_eq!(created.status, TaskStatus::Available);
    assert!(created.id.starts_with("task-"));

    // It heads the feed
    let response = send(&app, "GET", "/tasks", None, None).await;
    let feed: Vec<Task> = read_json(response).await;
    assert_eq!(feed[0].id, created.id);

    // Pick it
    let uri = format!("/tasks/{}/pick", created.id);
    let pick_body = json!({ "worker_id": "3", "worker_name": "Mateo Ruiz" });
    let response = send(&app, "POST", &uri, None, Some(pick_body.clone())).await;
    assert_eq!(response.status(), StatusCode::OK);
    let picked: Task = read_json(response).await;
    assert_eq!(picked.status, TaskStatus::InProgress);

    // A second pick conflicts
    let response = send(&app, "POST", &uri, None, Some(pick_body)).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let error: Value = read_json(response).await;
    assert_eq!(error["error"], "conflict");

    // Complete, then list the worker's tasks
    let uri = format!("/tasks/{}/complete", created.id);
    let response = send(&app, "POST", &uri, None, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, "GET", "/workers/3/tasks", None, None).await;
    let mine: Vec<Task> = read_json(response).await;
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].status, TaskStatus::Completed);

    let response = send(&app, "GET", "/tasks?status=completed", None, None).await;
    let completed: Vec<Task> = read_json(response).await;
    assert_eq!(completed[0].id, created.id);
}

#[tokio::test]
async fn posting_tasks_requires_admin_role() {
    let app = new_router(MissingPolicy::Report);
    let body = json!({
        "title": "Sneaky",
        "location": "Preska Hall",
        "due_at": "2030-01-01T17:00:00Z"
    });

    let response = send(&app, "POST", "/tasks", Some("worker"), Some(body.clone())).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let response = send(&app, "POST", "/tasks", None, Some(body)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let blank = json!({ "title": " ", "location": "Preska Hall", "due_at": "2030-01-01T17:00:00Z" });
    let response = send(&app, "POST", "/tasks", Some("admin"), Some(blank)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_ids_follow_the_configured_policy() {
    let strict = new_router(MissingPolicy::Report);
    let response = send(&strict, "POST", "/tasks/nope/complete", None, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = send(&strict, "GET", "/tasks/nope", None, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let lenient = new_router(MissingPolicy::Ignore);
    let response = send(&lenient, "POST", "/tasks/nope/complete", None, None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn schedule_replace_and_completed_hours() {
    let app = new_router(MissingPolicy::Report);

    let response = send(&app, "GET", "/schedules/days", None, None).await;
    let days: Vec<String> = read_json(response).await;
    assert_eq!(days.first().map(String::as_str), Some("Monday"));
    assert_eq!(days.len(), 7);

    let response = send(
        &app,
        "PUT",
        "/schedules/1",
        None,
        Some(json!({ "days": [
            { "day": "Monday", "start_time": "9:00 AM", "end_time": "1:00 PM" }
        ]})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let schedule: WorkerSchedule = read_json(response).await;
    assert_eq!(schedule.hours_picked(), 4.0);
    assert_eq!(schedule.hours_completed(), 12.0);

    let response = send(
        &app,
        "PATCH",
        "/schedules/1/completed",
        None,
        Some(json!({ "hours": 3.0 })),
    )
    .await;
    let schedule: WorkerSchedule = read_json(response).await;
    assert_eq!(schedule.hours_remaining(), 1.0);

    let response = send(
        &app,
        "PATCH",
        "/schedules/ghost/completed",
        None,
        Some(json!({ "hours": 3.0 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(
        &app,
        "PUT",
        "/schedules/1",
        None,
        Some(json!({ "days": [
            { "day": "Monday", "start_time": "09:00", "end_time": "10:00" },
            { "day": "Monday", "start_time": "11:00", "end_time": "12:00" }
        ]})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn staffing_and_overview() {
    let app = new_router(MissingPolicy::Report);

    let response = send(&app, "GET", "/staffing?day=Saturday", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let staffing: Vec<HallStaffing> = read_json(response).await;
    let scheduled: usize = staffing.iter().map(|s| s.scheduled_workers).sum();
    assert_eq!(scheduled, 1);

    let response = send(&app, "GET", "/staffing?day=Someday", None, None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(&app, "GET", "/overview", None, None).await;
    let overview: Value = read_json(response).await;
    assert_eq!(overview["available_tasks"], 4);
    assert_eq!(overview["gmw_workers"], 2);

    let response = send(&app, "GET", "/health", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn malformed_bodies_answer_bad_request() {
    let app = new_router(MissingPolicy::Report);

    let response = send(
        &app,
        "PUT",
        "/schedules/1",
        None,
        Some(json!({ "days": [
            { "day": "Funday", "start_time": "09:00", "end_time": "10:00" }
        ]})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: Value = read_json(response).await;
    assert_eq!(error["error"], "invalid_request");

    let response = send(
        &app,
        "POST",
        "/tasks",
        Some("admin"),
        Some(json!({ "location": "Preska Hall", "due_at": "2030-01-01T17:00:00Z" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: Value = read_json(response).await;
    assert_eq!(error["error"], "invalid_request");

    let response = send(
        &app,
        "POST",
        "/tasks/avail-1/pick",
        None,
        Some(json!({ "worker_id": "1" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(
        &app,
        "PATCH",
        "/schedules/1/completed",
        None,
        Some(json!({ "hours": "lots" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn staffing_defaults_to_today() {
    let app = new_router(MissingPolicy::Report);
    let response = send(&app, "GET", "/staffing", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let staffing: Vec<HallStaffing> = read_json(response).await;
    assert_eq!(staffing.len(), 4);
    let total: usize = staffing.iter().map(|s| s.total_workers).sum();
    assert_eq!(total, 6);
}
