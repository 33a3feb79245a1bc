//! API key presence middleware.
//!
//! Requests must carry a non-empty API key header (`X-API-Key` by default).
//! The value itself is not checked. A request without the header is answered
//! with `401 {"error":"Unauthorized"}` and goes no further down the stack.
//!
//! ```bash
//! curl -H "X-API-Key: anything" http://localhost:3000/api/products
//! ```
//!
//! # Bypassed Endpoints
//!
//! Bypass paths use **exact string matching** against `request.uri().path()`,
//! so `/health` is bypassed but `/health/` is not. Defaults: `/`, `/health`.

use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::{HeaderName, Request, Response};
use axum::response::IntoResponse;
use tower::{Layer, Service};
use tracing::{debug, warn};

use crate::error::AppError;

/// API key presence layer.
#[derive(Clone)]
pub struct ApiKeyAuth {
    header: HeaderName,
    bypass_paths: Arc<Vec<String>>,
}

impl ApiKeyAuth {
    /// Create a new API key layer.
    ///
    /// # Arguments
    ///
    /// * `header` - Header that must be present
    /// * `bypass_paths` - Exact paths that skip the check
    pub fn new(header: HeaderName, bypass_paths: Vec<String>) -> Self {
        Self {
            header,
            bypass_paths: Arc::new(bypass_paths),
        }
    }
}

impl<S> Layer<S> for ApiKeyAuth {
    type Service = ApiKeyAuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ApiKeyAuthService {
            inner,
            header: self.header.clone(),
            bypass_paths: self.bypass_paths.clone(),
        }
    }
}

/// API key presence service wrapper.
#[derive(Clone)]
pub struct ApiKeyAuthService<S> {
    inner: S,
    header: HeaderName,
    bypass_paths: Arc<Vec<String>>,
}

impl<S> Service<Request<Body>> for ApiKeyAuthService<S>
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
        let path = req.uri().path();

        let allowed = if self.bypass_paths.iter().any(|p| p == path) {
            debug!(path, "Bypassing API key check");
            true
        } else {
            has_api_key(&req, &self.header)
        };

        if !allowed {
            warn!(path, header = %self.header, "Missing API key");
            // Halt here: the inner service never sees this request
            return Box::pin(async { Ok::<_, S::Error>(AppError::Unauthorized.into_response()) });
        }

        let mut inner = self.inner.clone();
        Box::pin(async move { inner.call(req).await })
    }
}

/// True if `header` is present with a non-blank value.
fn has_api_key<B>(req: &Request<B>, header: &HeaderName) -> bool {
    req.headers()
        .get(header)
        .is_some_and(|value| !value.as_bytes().iter().all(u8::is_ascii_whitespace))
}
