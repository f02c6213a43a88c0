use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::{Json, http::StatusCode, response::{IntoResponse, Response}};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{error, warn};

use crate::middleware::request_id::RequestId;
use crate::models::TransitionError;
use crate::time::{self, TimestampError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { field: String, message: String },

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Stored timestamp is invalid: {0}")]
    Timestamp(#[from] TimestampError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } | AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Timestamp(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "INVALID_STATE",
            AppError::Database(_) | AppError::Timestamp(_) | AppError::Internal(_) => {
                "INTERNAL_SERVER_ERROR"
            }
        }
    }
}

impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        AppError::Conflict(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::validation("request_body", rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::validation("path", rejection.body_text())
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorResponse {
    pub fn new(code: &'static str, message: impl Into<String>, details: Option<Value>) -> Self {
        Self {
            error: ErrorDetail {
                code,
                message: message.into(),
                details,
            },
            request_id: RequestId::current().map(|id| id.to_string()),
            timestamp: time::rfc3339_now(),
        }
    }

    /// Generic 500 body; never carries the underlying cause.
    pub fn internal() -> Self {
        Self::new("INTERNAL_SERVER_ERROR", "Internal server error", None)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let request_id = RequestId::current().map(|id| id.to_string()).unwrap_or_default();

        let body = match &self {
            AppError::Validation { field, message } => {
                warn!(%request_id, field = %field, "validation failed: {}", message);
                ErrorResponse::new(
                    self.code(),
                    "Validation failed",
                    Some(json!({ "field": field, "error": message })),
                )
            }
            AppError::NotFound(_) | AppError::Conflict(_) => {
                warn!(%request_id, "{}", self);
                ErrorResponse::new(self.code(), self.to_string(), None)
            }
            AppError::Database(e) => {
                error!(%request_id, "database error: {}", e);
                ErrorResponse::internal()
            }
            AppError::Timestamp(e) => {
                error!(%request_id, "corrupt timestamp in store: {}", e);
                ErrorResponse::internal()
            }
            AppError::Internal(msg) => {
                error!(%request_id, "internal error: {}", msg);
                ErrorResponse::internal()
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_taxonomy_to_status_codes() {
        assert_eq!(AppError::validation("x", "y").status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::NotFound("Schedule").status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::from(TransitionError::AlreadyCompleted).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Database(sqlx::Error::RowNotFound).status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(AppError::Internal("boom".into()).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn transition_errors_become_conflicts() {
        let err = AppError::from(TransitionError::AlreadyStarted);
        assert_eq!(err.code(), "INVALID_STATE");
        assert_eq!(err.to_string(), "Visit already started");
    }

    #[test]
    fn not_found_names_the_resource() {
        assert_eq!(AppError::NotFound("Task").to_string(), "Task not found");
    }

    #[test]
    fn internal_body_hides_details() {
        let body = serde_json::to_value(ErrorResponse::internal()).unwrap();
        assert_eq!(body["error"]["code"], "INTERNAL_SERVER_ERROR");
        assert_eq!(body["error"]["message"], "Internal server error");
        assert!(body["error"].get("details").is_none());
        assert!(body.get("request_id").is_none());
    }
}
