mod activities;
pub mod extract;
pub mod response;
mod schedules;
mod tasks;
mod visits;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Router, middleware};

use crate::error::AppError;
use crate::middleware::{assign_request_id, catch_panic, log_requests};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/schedules", get(schedules::list_schedules))
        .route("/schedules/today", get(schedules::list_today))
        .route("/schedules/{id}", get(schedules::get_schedule))
        .route("/schedules/{id}/start", post(visits::start_visit))
        .route("/schedules/{id}/end", post(visits::end_visit))
        .route("/schedules/{id}/tasks", get(tasks::list_tasks))
        .route(
            "/schedules/{id}/activities",
            get(activities::list_activities).post(activities::create_activity),
        )
        .route("/tasks/{task_id}", put(tasks::update_task))
        .route(
            "/activities/{id}",
            get(activities::get_activity).put(activities::update_activity),
        )
        .route("/stats", get(schedules::stats))
        .fallback(not_found)
        .with_state(state)
        .layer(middleware::from_fn(catch_panic))
        .layer(middleware::from_fn(log_requests))
        .layer(middleware::from_fn(assign_request_id))
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

async fn not_found() -> AppError {
    AppError::NotFound("Route")
}
