use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::{
    Board, HallStaffing, NewTask, Role, ScheduleDay, StoreError, Task, WorkerSchedule,
    schedule::{day_name, parse_day},
};

pub const ROLE_HEADER: &str = "x-role";

#[derive(Clone)]
pub struct AppState {
    board: Arc<Board>,
}

impl AppState {
    pub fn new(board: Board) -> Self {
        Self {
            board: Arc::new(board),
        }
    }

    pub fn with_shared(board: Arc<Board>) -> Self {
        Self { board }
    }

    fn board(&self) -> &Board {
        &self.board
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Conflict(String),
    Invalid(String),
    Forbidden(String),
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }
}

impl From<StoreError> for ApiError {
    fn from(value: StoreError) -> Self {
        let message = value.to_string();
        match value {
            StoreError::TaskNotFound(_) | StoreError::WorkerNotFound(_) => {
                ApiError::NotFound(message)
            }
            StoreError::Conflict { .. } => ApiError::Conflict(message),
            StoreError::Validation(_) => ApiError::Invalid(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, "conflict", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::Forbidden(message) => (StatusCode::FORBIDDEN, "forbidden", message),
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

/// Malformed or mistyped JSON bodies answer 400 with the usual error body.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::invalid(rejection.body_text()))
}

/// `Ok(Some)` answers with the updated record; `Ok(None)` means the store
/// ignored an ineligible command and there is nothing to return.
fn transition_response<T: Serialize>(outcome: Result<Option<T>, StoreError>) -> Response {
    match outcome {
        Ok(Some(value)) => Json(value).into_response(),
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/overview", get(overview))
        .route("/staffing", get(staffing))
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/:id", get(get_task))
        .route("/tasks/:id/pick", post(pick_task))
        .route("/tasks/:id/unpick", post(unpick_task))
        .route("/tasks/:id/complete", post(complete_task))
        .route("/workers/:id/tasks", get(worker_tasks))
        .route("/schedules/days", get(days_of_week))
        .route(
            "/schedules/:worker_id",
            get(get_schedule).put(replace_schedule),
        )
        .route("/schedules/:worker_id/completed", patch(report_completed_hours))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, board: Arc<Board>) -> std::io::Result<()> {
    let app = router(AppState::with_shared(board));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "shift-board HTTP API listening");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok", "timestamp": chrono::Utc::now().to_rfc3339() }))
}

async fn overview(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.board().overview())
}

#[derive(Debug, Deserialize)]
struct StaffingQuery {
    day: Option<String>,
}

async fn staffing(
    State(state): State<AppState>,
    Query(query): Query<StaffingQuery>,
) -> Result<Json<Vec<HallStaffing>>, ApiError> {
    let staffing = match query.day.as_deref() {
        Some(raw) => {
            let day = parse_day(raw)
                .ok_or_else(|| ApiError::invalid(format!("unknown day '{raw}'")))?;
            state.board().hall_staffing(day)
        }
        None => state.board().hall_staffing_today(),
    };
    Ok(Json(staffing))
}

#[derive(Debug, Deserialize)]
struct TaskListQuery {
    status: Option<String>,
}

async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<TaskListQuery>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = &state.board().tasks;
    let listed = match query.status.as_deref().map(str::trim) {
        None | Some("available") => tasks.available_tasks(),
        Some("assigned") => tasks.assigned_tasks(),
        Some("completed") => tasks.completed_tasks(),
        Some("due_today") => tasks.tasks_due_today(),
        Some(other) => return Err(ApiError::invalid(format!("unknown task listing '{other}'"))),
    };
    Ok(Json(listed))
}

async fn get_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    state
        .board()
        .tasks
        .find_task(&task_id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("task {task_id} not found")))
}

fn require_role(headers: &HeaderMap, required: Role) -> Result<(), ApiError> {
    let role = headers
        .get(ROLE_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Role::from_str(value).ok());
    if role == Some(required) {
        Ok(())
    } else {
        Err(ApiError::Forbidden(format!(
            "this action requires the {required:?} role"
        )))
    }
}

async fn create_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<NewTask>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    require_role(&headers, Role::Admin)?;
    let fields = json_body(payload)?;
    fields.validate().map_err(ApiError::invalid)?;
    let created = state.board().tasks.create_task(fields);
    Ok((StatusCode::CREATED, Json(created)))
}

#[derive(Debug, Deserialize)]
struct PickPayload {
    worker_id: String,
    worker_name: String,
}

async fn pick_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    payload: Result<Json<PickPayload>, JsonRejection>,
) -> Response {
    let payload = match json_body(payload) {
        Ok(payload) => payload,
        Err(err) => return err.into_response(),
    };
    if payload.worker_id.trim().is_empty() {
        return ApiError::invalid("worker_id must not be empty").into_response();
    }
    transition_response(state.board().tasks.pick_task(
        &task_id,
        &payload.worker_id,
        &payload.worker_name,
    ))
}

async fn unpick_task(State(state): State<AppState>, Path(task_id): Path<String>) -> Response {
    transition_response(state.board().tasks.unpick_task(&task_id))
}

async fn complete_task(State(state): State<AppState>, Path(task_id): Path<String>) -> Response {
    transition_response(state.board().tasks.complete_task(&task_id))
}

async fn worker_tasks(
    State(state): State<AppState>,
    Path(worker_id): Path<String>,
) -> Json<Vec<Task>> {
    Json(state.board().tasks.tasks_by_worker(&worker_id))
}

async fn days_of_week() -> Json<Vec<&'static str>> {
    Json(crate::ScheduleStore::days_of_week().into_iter().map(day_name).collect())
}

async fn get_schedule(
    State(state): State<AppState>,
    Path(worker_id): Path<String>,
) -> Result<Json<WorkerSchedule>, ApiError> {
    state
        .board()
        .schedules
        .worker_schedule(&worker_id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("no schedule recorded for worker {worker_id}")))
}

#[derive(Debug, Deserialize)]
struct ReplaceSchedulePayload {
    days: Vec<ScheduleDay>,
}

async fn replace_schedule(
    State(state): State<AppState>,
    Path(worker_id): Path<String>,
    payload: Result<Json<ReplaceSchedulePayload>, JsonRejection>,
) -> Result<Json<WorkerSchedule>, ApiError> {
    let payload = json_body(payload)?;
    let updated = state
        .board()
        .schedules
        .update_schedule(&worker_id, payload.days)?;
    Ok(Json(updated))
}

#[derive(Debug, Deserialize)]
struct CompletedHoursPayload {
    hours: f64,
}

async fn report_completed_hours(
    State(state): State<AppState>,
    Path(worker_id): Path<String>,
    payload: Result<Json<CompletedHoursPayload>, JsonRejection>,
) -> Response {
    let payload = match json_body(payload) {
        Ok(payload) => payload,
        Err(err) => return err.into_response(),
    };
    transition_response(
        state
            .board()
            .schedules
            .update_hours_completed(&worker_id, payload.hours),
    )
}
