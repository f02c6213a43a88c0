use axum::Json;
use axum::extract::State;

use crate::error::AppError;
use crate::models::{EndVisitResponse, Location, StartVisitResponse, VisitLocationRequest};
use crate::services::VisitService;
use crate::state::AppState;

use super::extract::{ApiJson, ApiPath};
use super::response::{SuccessResponse, success};

pub async fn start_visit(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<VisitLocationRequest>,
) -> Result<Json<SuccessResponse<StartVisitResponse>>, AppError> {
    let location = Location::try_from(req)?;
    let started = VisitService::new(state.db.clone()).start_visit(id, location).await?;
    Ok(success(started))
}

pub async fn end_visit(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<VisitLocationRequest>,
) -> Result<Json<EndVisitResponse>, AppError> {
    let location = Location::try_from(req)?;
    let ended = VisitService::new(state.db.clone()).end_visit(id, location).await?;
    Ok(Json(ended))
}
