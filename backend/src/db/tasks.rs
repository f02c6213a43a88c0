use sqlx::{SqliteConnection, SqlitePool};

use crate::error::AppError;
use crate::models::{ScheduleStatus, Task, TaskStatus, TaskUpdate};

use super::rows::{TaskRow, convert, convert_all};

pub async fn fetch_tasks_for_schedule(db: &SqlitePool, schedule_id: i64) -> Result<Vec<Task>, AppError> {
    let rows = sqlx::query_as::<_, TaskRow>(
        r#"
        SELECT id, schedule_id, description, status, reason, created_at, updated_at
        FROM tasks
        WHERE schedule_id = ?1
        ORDER BY id ASC
        "#,
    )
    .bind(schedule_id)
    .fetch_all(db)
    .await?;

    convert_all(rows)
}

pub async fn find_task(db: &SqlitePool, id: i64) -> Result<Option<Task>, AppError> {
    sqlx::query_as::<_, TaskRow>(
        "SELECT id, schedule_id, description, status, reason, created_at, updated_at FROM tasks WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(db)
    .await?
    .map(convert)
    .transpose()
}

pub(crate) async fn insert_task(
    conn: &mut SqliteConnection,
    schedule_id: i64,
    description: &str,
    now: &str,
) -> Result<i64, AppError> {
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO tasks (schedule_id, description, status, reason, created_at, updated_at)
        VALUES (?1, ?2, ?3, NULL, ?4, ?5)
        RETURNING id
        "#,
    )
    .bind(schedule_id)
    .bind(description)
    .bind(TaskStatus::Pending)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;

    Ok(id)
}

/// Apply `update` only if the parent schedule is in progress. The gate and
/// the write are one statement; `false` means nothing was written.
pub async fn update_if_in_progress(
    db: &SqlitePool,
    id: i64,
    update: &TaskUpdate,
    updated_at: &str,
) -> Result<bool, AppError> {
    let affected = sqlx::query(
        r#"
        UPDATE tasks
        SET status = ?1,
            reason = ?2,
            updated_at = ?3
        WHERE id = ?4
          AND EXISTS (
              SELECT 1 FROM schedules
              WHERE schedules.id = tasks.schedule_id AND schedules.status = ?5
          )
        "#,
    )
    .bind(update.status)
    .bind(update.reason.as_deref().unwrap_or(""))
    .bind(updated_at)
    .bind(id)
    .bind(ScheduleStatus::InProgress)
    .execute(db)
    .await?
    .rows_affected();

    Ok(affected == 1)
}

/// Status of the schedule owning task `id`, or `None` if the task is unknown.
pub async fn parent_status(db: &SqlitePool, id: i64) -> Result<Option<ScheduleStatus>, AppError> {
    let status = sqlx::query_scalar::<_, ScheduleStatus>(
        r#"
        SELECT s.status
        FROM tasks t
        JOIN schedules s ON s.id = t.schedule_id
        WHERE t.id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;

    Ok(status)
}
