use axum::Json;
use axum::extract::State;

use crate::error::AppError;
use crate::models::{Task, TaskUpdateResponse, UpdateTaskRequest};
use crate::services::TaskService;
use crate::state::AppState;

use super::extract::{ApiJson, ApiPath};

pub async fn list_tasks(
    State(state): State<AppState>,
    ApiPath(schedule_id): ApiPath<i64>,
) -> Result<Json<Vec<Task>>, AppError> {
    let tasks = TaskService::new(state.db.clone()).list_for_schedule(schedule_id).await?;
    Ok(Json(tasks))
}

pub async fn update_task(
    State(state): State<AppState>,
    ApiPath(task_id): ApiPath<i64>,
    ApiJson(req): ApiJson<UpdateTaskRequest>,
) -> Result<Json<TaskUpdateResponse>, AppError> {
    let updated = TaskService::new(state.db.clone()).update_task(task_id, req).await?;
    Ok(Json(updated))
}
