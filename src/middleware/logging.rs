//! Request logging middleware.
//!
//! First stage of the pipeline. For every request it:
//!
//! 1. Logs the current timestamp, HTTP method and path
//! 2. Reuses the client's `X-Request-Id` or generates a UUIDv4
//! 3. Runs the rest of the stack inside a span carrying that id
//! 4. Echoes the id on the response and logs status and latency
//!
//! ```bash
//! curl -H "X-Request-Id: my-correlation-id" http://localhost:3000/api/products
//! ```

use std::task::{Context, Poll};
use std::time::Instant;

use axum::body::Body;
use axum::http::header::HeaderValue;
use axum::http::{Request, Response};
use chrono::Utc;
use tower::{Layer, Service};
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

use crate::metrics;

/// Header name for request ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Fallback header value when request ID parsing fails.
static UNKNOWN_REQUEST_ID: HeaderValue = HeaderValue::from_static("unknown");

/// Request logging layer for the Tower middleware stack.
#[derive(Clone, Default)]
pub struct RequestLogLayer;

impl RequestLogLayer {
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for RequestLogLayer {
    type Service = RequestLogService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestLogService { inner }
    }
}

/// Request logging service wrapper.
#[derive(Clone)]
pub struct RequestLogService<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for RequestLogService<S>
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

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let started = Instant::now();
        let method = req.method().clone();
        let path = req.uri().path().to_string();
        let request_id = extract_or_generate_request_id(&req);
        let header_value = request_id
            .parse::<HeaderValue>()
            .unwrap_or_else(|_| UNKNOWN_REQUEST_ID.clone());

        // Handlers and later stages see the same id
        req.headers_mut()
            .insert(REQUEST_ID_HEADER, header_value.clone());

        let span = info_span!("request", request_id = %request_id, method = %method, path = %path);
        span.in_scope(|| {
            info!(
                timestamp = %Utc::now().to_rfc3339(),
                method = %method,
                path = %path,
                "Incoming request"
            );
        });

        let mut inner = self.inner.clone();

        Box::pin(
            async move {
                let mut response = inner.call(req).await?;

                let status = response.status();
                let elapsed = started.elapsed();
                info!(
                    status = status.as_u16(),
                    latency_ms = elapsed.as_millis() as u64,
                    "Request completed"
                );
                metrics::record_request(method.as_str(), status.as_u16(), elapsed.as_secs_f64());

                response
                    .headers_mut()
                    .insert(REQUEST_ID_HEADER, header_value);

                Ok(response)
            }
            .instrument(span),
        )
    }
}

/// Extract request ID from headers or generate a new one.
fn extract_or_generate_request_id<B>(req: &Request<B>) -> String {
    if let Some(header_value) = req.headers().get(REQUEST_ID_HEADER)
        && let Ok(value) = header_value.to_str()
        && !value.is_empty()
    {
        return value.to_string();
    }

    Uuid::new_v4().to_string()
}
