use sqlx::SqlitePool;
use tracing::info;

use crate::db::{activities, schedules};
use crate::error::AppError;
use crate::models::{Activity, CreateActivityRequest, UpdateActivityRequest};

pub struct ActivityService {
    db: SqlitePool,
}

impl ActivityService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn list_for_schedule(&self, schedule_id: i64) -> Result<Vec<Activity>, AppError> {
        self.ensure_schedule(schedule_id).await?;
        activities::fetch_activities_for_schedule(&self.db, schedule_id).await
    }

    pub async fn get(&self, id: i64) -> Result<Activity, AppError> {
        activities::find_activity(&self.db, id)
            .await?
            .ok_or(AppError::NotFound("Activity"))
    }

    pub async fn create(
        &self,
        schedule_id: i64,
        req: CreateActivityRequest,
    ) -> Result<Activity, AppError> {
        let new = req.validate()?;
        self.ensure_schedule(schedule_id).await?;

        let activity = activities::insert_activity(&self.db, schedule_id, &new).await?;
        info!(schedule_id, activity_id = activity.id, "activity created");
        Ok(activity)
    }

    /// Record whether the activity was done. No schedule-status gate applies.
    pub async fn update(&self, id: i64, req: UpdateActivityRequest) -> Result<Activity, AppError> {
        let resolution = req.validate()?;

        let activity = activities::update_resolution(&self.db, id, &resolution)
            .await?
            .ok_or(AppError::NotFound("Activity"))?;
        info!(activity_id = id, is_resolved = activity.is_resolved, "activity updated");
        Ok(activity)
    }

    async fn ensure_schedule(&self, schedule_id: i64) -> Result<(), AppError> {
        if schedules::schedule_exists(&self.db, schedule_id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound("Schedule"))
        }
    }
}
