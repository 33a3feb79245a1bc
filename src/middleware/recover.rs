//! Last-resort handling for panics raised anywhere in the stack.
//!
//! Wrapped around the whole router via `tower_http::catch_panic`, so a
//! panicking handler or middleware still produces the standard
//! `500 {"error":"Internal Server Error"}` body.

use std::any::Any;

use axum::body::Body;
use axum::http::{Response, StatusCode, header};
use tower_http::catch_panic::CatchPanicLayer;
use tracing::error;

use crate::error::{ErrorResponse, INTERNAL_ERROR_MESSAGE};

/// Panic handler signature expected by [`CatchPanicLayer::custom`].
pub type PanicHandler = fn(Box<dyn Any + Send + 'static>) -> Response<Body>;

/// Build the catch-panic layer.
pub fn catch_panic_layer() -> CatchPanicLayer<PanicHandler> {
    CatchPanicLayer::custom(handle_panic as PanicHandler)
}

/// Log the panic payload and answer with a generic 500.
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic payload"
    };
    error!(panic = %detail, "Request handler panicked");

    let body = serde_json::to_string(&ErrorResponse::new(INTERNAL_ERROR_MESSAGE))
        .unwrap_or_else(|_| format!(r#"{{"error":"{INTERNAL_ERROR_MESSAGE}"}}"#));

    let mut response = Response::new(Body::from(body));
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/json"),
    );
    response
}
