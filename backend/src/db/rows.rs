//! Raw row shapes as SQLite returns them, and their conversion into the
//! domain types. Timestamp columns are TEXT and parsed here.

use sqlx::FromRow;

use crate::error::AppError;
use crate::models::{Activity, Schedule, ScheduleStatus, Task, TaskStatus, Visit};
use crate::time::{TimestampError, parse_optional, parse_timestamp};

#[derive(Debug, FromRow)]
pub(crate) struct ScheduleRow {
    pub id: i64,
    pub client_name: String,
    pub shift_start: String,
    pub shift_end: String,
    pub latitude: f64,
    pub longitude: f64,
    pub status: ScheduleStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<ScheduleRow> for Schedule {
    type Error = TimestampError;

    fn try_from(row: ScheduleRow) -> Result<Self, Self::Error> {
        Ok(Schedule {
            id: row.id,
            client_name: row.client_name,
            shift_start: parse_timestamp(&row.shift_start)?,
            shift_end: parse_timestamp(&row.shift_end)?,
            latitude: row.latitude,
            longitude: row.longitude,
            status: row.status,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct TaskRow {
    pub id: i64,
    pub schedule_id: i64,
    pub description: String,
    pub status: TaskStatus,
    pub reason: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<TaskRow> for Task {
    type Error = TimestampError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        Ok(Task {
            id: row.id,
            schedule_id: row.schedule_id,
            description: row.description,
            status: row.status,
            reason: row.reason.filter(|r| !r.is_empty()),
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct VisitRow {
    pub id: i64,
    pub schedule_id: i64,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub start_lat: Option<f64>,
    pub start_lng: Option<f64>,
    pub end_lat: Option<f64>,
    pub end_lng: Option<f64>,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<VisitRow> for Visit {
    type Error = TimestampError;

    fn try_from(row: VisitRow) -> Result<Self, Self::Error> {
        Ok(Visit {
            id: row.id,
            schedule_id: row.schedule_id,
            start_time: parse_optional(row.start_time)?,
            end_time: parse_optional(row.end_time)?,
            start_lat: row.start_lat,
            start_lng: row.start_lng,
            end_lat: row.end_lat,
            end_lng: row.end_lng,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct ActivityRow {
    pub id: i64,
    pub schedule_id: i64,
    pub title: String,
    pub description: String,
    pub is_resolved: bool,
    pub reason: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<ActivityRow> for Activity {
    type Error = TimestampError;

    fn try_from(row: ActivityRow) -> Result<Self, Self::Error> {
        Ok(Activity {
            id: row.id,
            schedule_id: row.schedule_id,
            title: row.title,
            description: row.description,
            is_resolved: row.is_resolved,
            reason: row.reason.filter(|r| !r.is_empty()),
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

pub(crate) fn convert<R, T>(row: R) -> Result<T, AppError>
where
    T: TryFrom<R, Error = TimestampError>,
{
    Ok(T::try_from(row)?)
}

pub(crate) fn convert_all<R, T>(rows: Vec<R>) -> Result<Vec<T>, AppError>
where
    T: TryFrom<R, Error = TimestampError>,
{
    rows.into_iter().map(convert).collect()
}
