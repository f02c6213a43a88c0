use axum::Json;
use serde::Serialize;

use crate::middleware::RequestId;
use crate::time;

/// `{data, request_id, timestamp}` wrapper for endpoints that answer with an
/// envelope rather than the bare resource.
#[derive(Debug, Serialize)]
pub struct SuccessResponse<T> {
    pub data: T,
    pub request_id: String,
    pub timestamp: String,
}

pub fn success<T: Serialize>(data: T) -> Json<SuccessResponse<T>> {
    Json(SuccessResponse {
        data,
        request_id: RequestId::current().map(|id| id.to_string()).unwrap_or_default(),
        timestamp: time::rfc3339_now(),
    })
}
