use sqlx::{Executor, Sqlite, SqlitePool};

use crate::error::AppError;
use crate::models::{Activity, ActivityResolution, NewActivity};
use crate::time::{self, format_db};

use super::rows::{ActivityRow, convert, convert_all};

const ACTIVITY_COLUMNS: &str =
    "id, schedule_id, title, description, is_resolved, reason, created_at, updated_at";

pub async fn fetch_activities_for_schedule(
    db: &SqlitePool,
    schedule_id: i64,
) -> Result<Vec<Activity>, AppError> {
    let sql = format!(
        "SELECT {ACTIVITY_COLUMNS} FROM activities WHERE schedule_id = ?1 ORDER BY created_at ASC, id ASC"
    );
    let rows = sqlx::query_as::<_, ActivityRow>(&sql)
        .bind(schedule_id)
        .fetch_all(db)
        .await?;
    convert_all(rows)
}

pub async fn find_activity(db: &SqlitePool, id: i64) -> Result<Option<Activity>, AppError> {
    let sql = format!("SELECT {ACTIVITY_COLUMNS} FROM activities WHERE id = ?1");
    sqlx::query_as::<_, ActivityRow>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await?
        .map(convert)
        .transpose()
}

/// Works on the pool or inside a caller's transaction.
pub async fn insert_activity<'e, E>(
    executor: E,
    schedule_id: i64,
    new: &NewActivity,
) -> Result<Activity, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let now = format_db(&time::now());
    let sql = format!(
        r#"
        INSERT INTO activities
            (schedule_id, title, description, is_resolved, reason, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        RETURNING {ACTIVITY_COLUMNS}
        "#
    );
    let row = sqlx::query_as::<_, ActivityRow>(&sql)
        .bind(schedule_id)
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.is_resolved)
        .bind(new.reason.as_deref().unwrap_or(""))
        .bind(&now)
        .bind(&now)
        .fetch_one(executor)
        .await?;

    convert(row)
}

/// Returns `None` when no activity has this id.
pub async fn update_resolution(
    db: &SqlitePool,
    id: i64,
    resolution: &ActivityResolution,
) -> Result<Option<Activity>, AppError> {
    let now = format_db(&time::now());
    let sql = format!(
        r#"
        UPDATE activities
        SET is_resolved = ?1,
            reason = ?2,
            updated_at = ?3
        WHERE id = ?4
        RETURNING {ACTIVITY_COLUMNS}
        "#
    );
    sqlx::query_as::<_, ActivityRow>(&sql)
        .bind(resolution.is_resolved)
        .bind(resolution.reason.as_deref().unwrap_or(""))
        .bind(&now)
        .bind(id)
        .fetch_optional(db)
        .await?
        .map(convert)
        .transpose()
}
