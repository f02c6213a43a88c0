use sqlx::{SqliteConnection, SqlitePool};
use tracing::info;

use crate::db::{schedules, visits};
use crate::error::AppError;
use crate::models::visit::duration_minutes;
use crate::models::{EndVisitResponse, Location, ScheduleStatus, StartVisitResponse, TransitionError};
use crate::time::{self, format_db};

/// Clock-in / clock-out. Each transition moves the schedule status and writes
/// the visit row in one transaction; dropping the transaction on an early
/// return rolls both back.
pub struct VisitService {
    db: SqlitePool,
}

impl VisitService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn start_visit(
        &self,
        schedule_id: i64,
        location: Location,
    ) -> Result<StartVisitResponse, AppError> {
        let now = time::now();
        let stamp = format_db(&now);

        let mut tx = self.db.begin().await?;
        advance(&mut *tx, schedule_id, ScheduleStatus::Upcoming, &stamp, ScheduleStatus::start).await?;
        visits::record_start(&mut *tx, schedule_id, &location, &stamp).await?;
        tx.commit().await?;

        info!(
            schedule_id,
            latitude = location.latitude,
            longitude = location.longitude,
            "visit started"
        );

        Ok(StartVisitResponse {
            message: "Visit started successfully",
            timestamp: now,
            location,
        })
    }

    pub async fn end_visit(
        &self,
        schedule_id: i64,
        location: Location,
    ) -> Result<EndVisitResponse, AppError> {
        let now = time::now();
        let stamp = format_db(&now);

        let mut tx = self.db.begin().await?;
        advance(&mut *tx, schedule_id, ScheduleStatus::InProgress, &stamp, ScheduleStatus::end).await?;
        let start_time = visits::start_time(&mut *tx, schedule_id)
            .await?
            .ok_or(TransitionError::NotStarted)?;
        visits::record_end(&mut *tx, schedule_id, &location, &stamp).await?;
        tx.commit().await?;

        let duration = duration_minutes(start_time, now);
        info!(schedule_id, duration_minutes = duration, "visit ended");

        Ok(EndVisitResponse {
            message: "Visit ended successfully",
            start_time,
            end_time: now,
            duration_minutes: duration,
            end_location: location,
        })
    }
}

/// Conditionally move `schedule_id` out of `from` using `step` for the target
/// status. When nothing matched, the current status decides between
/// `NotFound` and the transition's own conflict.
async fn advance(
    conn: &mut SqliteConnection,
    schedule_id: i64,
    from: ScheduleStatus,
    updated_at: &str,
    step: fn(ScheduleStatus) -> Result<ScheduleStatus, TransitionError>,
) -> Result<(), AppError> {
    let to = step(from)?;
    if schedules::transition_schedule(&mut *conn, schedule_id, from, to, updated_at).await? {
        return Ok(());
    }

    match schedules::status_of(&mut *conn, schedule_id).await? {
        None => Err(AppError::NotFound("Schedule")),
        Some(current) => {
            let err = step(current).err().unwrap_or(TransitionError::NotInProgress);
            Err(err.into())
        }
    }
}
