//! Task and submission API endpoints.
//!
//! Provides endpoints for the task lifecycle:
//! - List tasks
//! - Get a task
//! - Create a task
//! - Submit to a task (admission-controlled)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;

use crate::notify::NotificationPayload;
use crate::store::{StoreError, Submission, Task};

use super::routes::AppState;

/// Create task routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tasks", get(list_tasks))
        .route("/tasks", post(create_task))
        .route("/tasks/:id", get(get_task))
        .route("/tasks/:id/submit", post(create_submission))
}

// ─────────────────────────────────────────────────────────────────────────────
// Request Types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateSubmissionRequest {
    pub submitter_name: String,
    pub content: String,
}

/// Map store errors onto the HTTP taxonomy: not-found → 404, quota → 409,
/// anything else in storage → 500.
fn error_response(err: StoreError) -> (StatusCode, String) {
    let status = match err {
        StoreError::TaskNotFound(_) => StatusCode::NOT_FOUND,
        StoreError::QuotaFull(_) => StatusCode::CONFLICT,
        StoreError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, err.to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// GET /tasks - List all tasks.
async fn list_tasks(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Task>>, (StatusCode, String)> {
    let tasks = state.store.list_tasks().await.map_err(error_response)?;
    Ok(Json(tasks))
}

/// GET /tasks/:id - Get a single task.
async fn get_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Task>, (StatusCode, String)> {
    match state.store.get_task(id).await.map_err(error_response)? {
        Some(task) => Ok(Json(task)),
        None => Err((StatusCode::NOT_FOUND, format!("task {} not found", id))),
    }
}

/// POST /tasks - Create a task.
async fn create_task(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), (StatusCode, String)> {
    let task = state
        .store
        .create_task(&req.title, &req.description)
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// POST /tasks/:id/submit - Admit a submission for a task.
///
/// The notification call runs after the store has committed; its failure is
/// logged and swallowed, never surfaced to the submitter.
async fn create_submission(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<CreateSubmissionRequest>,
) -> Result<(StatusCode, Json<Submission>), (StatusCode, String)> {
    let submission = state
        .store
        .create_submission(id, &req.submitter_name, &req.content)
        .await
        .map_err(error_response)?;

    let payload = NotificationPayload {
        submission_id: submission.id,
        task_id: submission.task_id,
        submitter_name: submission.submitter_name.clone(),
    };
    if let Err(e) = state.notifier.submission_created(&payload).await {
        warn!("Failed to send submission notification: {}", e);
    }

    Ok((StatusCode::CREATED, Json(submission)))
}
