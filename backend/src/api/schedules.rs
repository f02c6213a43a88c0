use axum::Json;
use axum::extract::State;

use crate::db::schedules;
use crate::error::AppError;
use crate::models::{Schedule, ScheduleWithTasks, Stats};
use crate::state::AppState;
use crate::time;

use super::extract::ApiPath;

pub async fn list_schedules(State(state): State<AppState>) -> Result<Json<Vec<Schedule>>, AppError> {
    let schedules = schedules::fetch_schedules(&state.db).await?;
    Ok(Json(schedules))
}

pub async fn list_today(State(state): State<AppState>) -> Result<Json<Vec<Schedule>>, AppError> {
    let schedules = schedules::fetch_schedules_on(&state.db, &time::today()).await?;
    Ok(Json(schedules))
}

pub async fn get_schedule(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ScheduleWithTasks>, AppError> {
    let schedule = schedules::fetch_schedule_with_tasks(&state.db, id)
        .await?
        .ok_or(AppError::NotFound("Schedule"))?;
    Ok(Json(schedule))
}

pub async fn stats(State(state): State<AppState>) -> Result<Json<Stats>, AppError> {
    let stats = schedules::fetch_stats(&state.db, &time::today()).await?;
    Ok(Json(stats))
}
