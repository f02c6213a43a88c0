use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::db::{schedules, tasks};
use crate::error::AppError;
use crate::models::{Task, TaskUpdateResponse, UpdateTaskRequest};
use crate::time::{self, format_db};

pub struct TaskService {
    db: SqlitePool,
}

impl TaskService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn list_for_schedule(&self, schedule_id: i64) -> Result<Vec<Task>, AppError> {
        if !schedules::schedule_exists(&self.db, schedule_id).await? {
            return Err(AppError::NotFound("Schedule"));
        }
        tasks::fetch_tasks_for_schedule(&self.db, schedule_id).await
    }

    /// Validates the request before touching the store, then applies it only
    /// while the parent schedule is in progress.
    pub async fn update_task(
        &self,
        task_id: i64,
        req: UpdateTaskRequest,
    ) -> Result<TaskUpdateResponse, AppError> {
        let update = req.validate()?;
        let stamp = format_db(&time::now());

        if !tasks::update_if_in_progress(&self.db, task_id, &update, &stamp).await? {
            return match tasks::parent_status(&self.db, task_id).await? {
                None => Err(AppError::NotFound("Task")),
                Some(status) => {
                    debug!(task_id, %status, "task update rejected");
                    Err(AppError::Conflict(
                        "Cannot update tasks unless the visit is in progress".to_string(),
                    ))
                }
            };
        }

        let task = tasks::find_task(&self.db, task_id)
            .await?
            .ok_or(AppError::NotFound("Task"))?;
        info!(task_id, status = ?task.status, "task updated");

        Ok(TaskUpdateResponse {
            message: "Task updated successfully",
            task,
        })
    }
}
