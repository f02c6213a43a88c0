use std::any::Any;
use std::backtrace::Backtrace;

use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use super::request_id::RequestId;
use crate::error::ErrorResponse;

/// Runs the rest of the stack on its own task so a panicking handler turns
/// into a 500 envelope instead of a dropped connection.
pub async fn catch_panic(req: Request, next: Next) -> Response {
    let request_id = RequestId::current();
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    let fut = next.run(req);
    let handle = match request_id {
        Some(id) => tokio::spawn(id.scope(fut)),
        None => tokio::spawn(fut),
    };

    match handle.await {
        Ok(response) => response,
        Err(err) => {
            let request_id = request_id.map(|id| id.to_string()).unwrap_or_default();
            if err.is_panic() {
                let message = panic_message(err.into_panic().as_ref());
                error!(%method, %path, %request_id, panic = %message, "handler panicked");
            } else {
                error!(%method, %path, %request_id, "handler task cancelled");
            }
            (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::internal())).into_response()
        }
    }
}

/// Log every panic with a backtrace before unwinding reaches [`catch_panic`].
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let backtrace = Backtrace::force_capture();
        let request_id = RequestId::current()
            .map(|id| id.to_string())
            .unwrap_or_default();
        error!(%request_id, "panic: {}\n{}", info, backtrace);
    }));
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
