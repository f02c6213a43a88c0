use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

use super::non_blank;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Completed,
    NotCompleted,
}

#[derive(Debug, Clone, Serialize)]
pub struct Task {
    pub id: i64,
    pub schedule_id: i64,
    pub description: String,
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub created_at: DateTime<Local>,
    pub updated_at: DateTime<Local>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTaskRequest {
    pub status: TaskStatus,
    #[serde(default)]
    pub reason: Option<String>,
}

/// A validated task status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskUpdate {
    pub status: TaskStatus,
    pub reason: Option<String>,
}

impl UpdateTaskRequest {
    pub fn validate(self) -> Result<TaskUpdate, AppError> {
        match self.status {
            TaskStatus::Pending => Err(AppError::validation(
                "status",
                "Status must be completed or not_completed",
            )),
            TaskStatus::Completed => Ok(TaskUpdate {
                status: TaskStatus::Completed,
                reason: None,
            }),
            TaskStatus::NotCompleted => match non_blank(self.reason) {
                Some(reason) => Ok(TaskUpdate {
                    status: TaskStatus::NotCompleted,
                    reason: Some(reason),
                }),
                None => Err(AppError::validation(
                    "reason",
                    "Reason is required when marking task as not completed",
                )),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TaskUpdateResponse {
    pub message: &'static str,
    pub task: Task,
}
