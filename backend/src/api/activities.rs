use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::error::AppError;
use crate::models::{Activity, CreateActivityRequest, UpdateActivityRequest};
use crate::services::ActivityService;
use crate::state::AppState;

use super::extract::{ApiJson, ApiPath};

pub async fn list_activities(
    State(state): State<AppState>,
    ApiPath(schedule_id): ApiPath<i64>,
) -> Result<Json<Vec<Activity>>, AppError> {
    let activities = ActivityService::new(state.db.clone())
        .list_for_schedule(schedule_id)
        .await?;
    Ok(Json(activities))
}

pub async fn create_activity(
    State(state): State<AppState>,
    ApiPath(schedule_id): ApiPath<i64>,
    ApiJson(req): ApiJson<CreateActivityRequest>,
) -> Result<(StatusCode, Json<Activity>), AppError> {
    let activity = ActivityService::new(state.db.clone()).create(schedule_id, req).await?;
    Ok((StatusCode::CREATED, Json(activity)))
}

pub async fn get_activity(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Activity>, AppError> {
    let activity = ActivityService::new(state.db.clone()).get(id).await?;
    Ok(Json(activity))
}

pub async fn update_activity(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<UpdateActivityRequest>,
) -> Result<Json<Activity>, AppError> {
    let activity = ActivityService::new(state.db.clone()).update(id, req).await?;
    Ok(Json(activity))
}
