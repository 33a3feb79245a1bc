//! JSON body parsing middleware.
//!
//! Buffers JSON request bodies (up to a configured limit), parses them once
//! and stores the result in the request extensions as [`JsonBody`]. Later
//! stages (validation, handlers) read the parsed value from there.
//!
//! | Request | Outcome |
//! |---|---|
//! | JSON content type, valid body | `JsonBody` inserted, body restored |
//! | JSON content type, malformed body | 400 with a sanitized message |
//! | Body larger than the limit | 413 |
//! | Empty body or other content type | passed through untouched |

use std::task::{Context, Poll};

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Request, Response, header};
use axum::response::IntoResponse;
use serde_json::Value;
use tower::{Layer, Service};
use tracing::{debug, warn};

use crate::error::AppError;

/// Parsed JSON request body, available via request extensions.
#[derive(Debug, Clone)]
pub struct JsonBody(pub Value);

/// JSON body parsing layer.
#[derive(Clone)]
pub struct JsonBodyLayer {
    limit: usize,
}

impl JsonBodyLayer {
    /// Create a layer that accepts bodies of at most `limit` bytes.
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }
}

impl<S> Layer<S> for JsonBodyLayer {
    type Service = JsonBodyService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        JsonBodyService {
            inner,
            limit: self.limit,
        }
    }
}

/// JSON body parsing service wrapper.
#[derive(Clone)]
pub struct JsonBodyService<S> {
    inner: S,
    limit: usize,
}

impl<S> Service<Request<Body>> for JsonBodyService<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response<Body>;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let limit = self.limit;
        let mut inner = self.inner.clone();

        if !is_json_content_type(req.headers()) {
            return Box::pin(async move { inner.call(req).await });
        }

        Box::pin(async move {
            let (mut parts, body) = req.into_parts();

            let bytes = match axum::body::to_bytes(body, limit).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!(limit, error = %e, "Failed to read request body");
                    return Ok(AppError::PayloadTooLarge.into_response());
                }
            };

            match parse_json(&bytes) {
                Ok(Some(value)) => {
                    debug!(bytes = bytes.len(), "Parsed JSON request body");
                    parts.extensions.insert(JsonBody(value));
                }
                Ok(None) => {}
                Err(e) => return Ok(e.into_response()),
            }

            inner.call(Request::from_parts(parts, Body::from(bytes))).await
        })
    }
}

/// Parse a buffered body. Whitespace-only bodies parse to `None`.
fn parse_json(bytes: &Bytes) -> Result<Option<Value>, AppError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    Ok(Some(serde_json::from_slice(bytes)?))
}

/// True for `application/json` and `application/*+json` media types.
fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}
