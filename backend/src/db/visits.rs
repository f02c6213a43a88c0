use chrono::{DateTime, Local};
use sqlx::{SqliteConnection, SqlitePool};

use crate::error::AppError;
use crate::models::{Location, Visit};
use crate::time::parse_optional;

use super::rows::{VisitRow, convert};

pub async fn find_visit_by_schedule(db: &SqlitePool, schedule_id: i64) -> Result<Option<Visit>, AppError> {
    sqlx::query_as::<_, VisitRow>(
        r#"
        SELECT id, schedule_id, start_time, end_time, start_lat, start_lng, end_lat, end_lng,
            created_at, updated_at
        FROM visits
        WHERE schedule_id = ?1
        "#,
    )
    .bind(schedule_id)
    .fetch_optional(db)
    .await?
    .map(convert)
    .transpose()
}

pub(crate) async fn insert_empty_visit(
    conn: &mut SqliteConnection,
    schedule_id: i64,
    now: &str,
) -> Result<(), AppError> {
    sqlx::query("INSERT INTO visits (schedule_id, created_at, updated_at) VALUES (?1, ?2, ?3)")
        .bind(schedule_id)
        .bind(now)
        .bind(now)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Clock-in time of the schedule's visit, `None` when the visit has not
/// started or the row is missing.
pub async fn start_time(
    conn: &mut SqliteConnection,
    schedule_id: i64,
) -> Result<Option<DateTime<Local>>, AppError> {
    let raw: Option<Option<String>> =
        sqlx::query_scalar("SELECT start_time FROM visits WHERE schedule_id = ?1")
            .bind(schedule_id)
            .fetch_optional(&mut *conn)
            .await?;

    Ok(parse_optional(raw.flatten())?)
}

pub async fn record_start(
    conn: &mut SqliteConnection,
    schedule_id: i64,
    location: &Location,
    at: &str,
) -> Result<(), AppError> {
    let affected = sqlx::query(
        r#"
        UPDATE visits
        SET start_time = ?1,
            start_lat = ?2,
            start_lng = ?3,
            updated_at = ?4
        WHERE schedule_id = ?5
        "#,
    )
    .bind(at)
    .bind(location.latitude)
    .bind(location.longitude)
    .bind(at)
    .bind(schedule_id)
    .execute(&mut *conn)
    .await?
    .rows_affected();

    expect_one_row(affected, schedule_id)
}

pub async fn record_end(
    conn: &mut SqliteConnection,
    schedule_id: i64,
    location: &Location,
    at: &str,
) -> Result<(), AppError> {
    let affected = sqlx::query(
        r#"
        UPDATE visits
        SET end_time = ?1,
            end_lat = ?2,
            end_lng = ?3,
            updated_at = ?4
        WHERE schedule_id = ?5 AND start_time IS NOT NULL
        "#,
    )
    .bind(at)
    .bind(location.latitude)
    .bind(location.longitude)
    .bind(at)
    .bind(schedule_id)
    .execute(&mut *conn)
    .await?
    .rows_affected();

    expect_one_row(affected, schedule_id)
}

fn expect_one_row(affected: u64, schedule_id: i64) -> Result<(), AppError> {
    if affected == 1 {
        Ok(())
    } else {
        Err(AppError::Internal(format!(
            "expected one visit row for schedule {schedule_id}, updated {affected}"
        )))
    }
}
