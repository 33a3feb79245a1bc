//! Product payload validation middleware.
//!
//! Mounted with `route_layer` on the `/api/products` routes only. It checks
//! the body parsed by [`JsonBodyLayer`](super::JsonBodyLayer) before the
//! handler runs:
//!
//! - `POST`: full product required ([`validate_new_product`])
//! - `PUT`: any subset of fields ([`validate_product_patch`])
//! - every other method passes through unchecked

use axum::extract::Request;
use axum::http::Method;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use super::body::JsonBody;
use crate::validation::{validate_new_product, validate_product_patch};

/// Reject invalid product writes with 400 before they reach a handler.
pub async fn validate_product_payload(req: Request, next: Next) -> Response {
    let body = req.extensions().get::<JsonBody>().map(|b| &b.0);

    let result = match req.method() {
        &Method::POST => validate_new_product(body),
        &Method::PUT => validate_product_patch(body),
        _ => Ok(()),
    };

    match result {
        Ok(()) => next.run(req).await,
        Err(e) => e.into_response(),
    }
}
