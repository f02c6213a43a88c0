use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{error, info, warn};

use super::request_id::RequestId;

/// One log line per request, levelled by response status.
pub async fn log_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let latency_ms = started.elapsed().as_millis() as u64;
    let request_id = RequestId::current()
        .map(|id| id.to_string())
        .unwrap_or_default();

    if response.status().is_server_error() {
        error!(%method, %path, status, latency_ms, %request_id, "request failed");
    } else if response.status().is_client_error() {
        warn!(%method, %path, status, latency_ms, %request_id, "client error");
    } else {
        info!(%method, %path, status, latency_ms, %request_id, "request completed");
    }

    response
}
