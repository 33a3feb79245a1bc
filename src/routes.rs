//! Application routing configuration with middleware stack.
//!
//! # Middleware Stack (applied in order)
//!
//! ```text
//! Request
//!    │
//!    ▼
//! ┌──────────────────┐
//! │   Catch Panic    │ ← 500 if anything below panics
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐
//! │  Request Logging │ ← timestamp, method, path, X-Request-Id
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐
//! │      CORS        │ ← Cross-origin headers
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐
//! │  API Key Check   │ ← 401 if missing (bypassed for /, /health)
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐
//! │   JSON Body      │ ← 400 malformed, 413 too large
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐
//! │   Validation     │ ← 400 on bad POST/PUT (/api/products only)
//! └────────┬─────────┘
//!          ▼
//!      Handler
//! ```
//!
//! # Route Groups
//!
//! - `/`, `/health` - Welcome page and health probe (auth bypassed)
//! - `/api/products` - Product catalog CRUD

use axum::Router;
use axum::http::HeaderName;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::handlers;
use crate::middleware::{
    ApiKeyAuth, JsonBodyLayer, RequestLogLayer, catch_panic_layer, validate_product_payload,
};
use crate::state::AppState;

/// Build the application router with all routes and middleware configured.
///
/// # Errors
///
/// Returns `AppError::Config` if the configured API key header is not a
/// valid header name.
pub fn build_router(state: AppState) -> AppResult<Router> {
    let config = &state.config;

    let api_key_header = HeaderName::from_bytes(config.api_key_header.as_bytes())
        .map_err(|e| AppError::Config(format!("Invalid API key header: {e}")))?;

    // =========================================================================
    // Product routes (validation scoped here only)
    // =========================================================================
    let products = Router::new()
        .route(
            "/api/products",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route(
            "/api/products/{id}",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .route_layer(axum::middleware::from_fn(validate_product_payload));

    let mut router = Router::new()
        .route("/", get(handlers::welcome))
        .route("/health", get(handlers::health_check))
        .merge(products)
        .fallback(handlers::route_not_found);

    // =========================================================================
    // Apply Middleware Stack (order matters - applied bottom to top)
    // =========================================================================

    // 1. JSON body parsing
    info!(
        max_body_bytes = config.max_request_body_size,
        "Request body size limit configured"
    );
    router = router.layer(JsonBodyLayer::new(config.max_request_body_size));

    // 2. API key presence
    info!(
        header = %api_key_header,
        bypass = ?config.auth_bypass_paths,
        "API key check enabled"
    );
    router = router.layer(ApiKeyAuth::new(
        api_key_header,
        config.auth_bypass_paths.clone(),
    ));

    // 3. CORS
    router = router.layer(build_cors_layer(&config.cors_allowed_origins));

    // 4. Request logging
    router = router.layer(RequestLogLayer::new());

    // 5. Panic recovery - outermost
    router = router.layer(catch_panic_layer());

    Ok(router.with_state(state))
}

/// Build CORS layer from configuration.
///
/// Using `*` (any origin) is convenient for development but should be
/// avoided in production. Specify explicit origins instead.
fn build_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let allow_any = allowed_origins.iter().any(|o| o == "*");

    if allow_any {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_build_router_default_config() {
        let state = AppState::new(Config::default());
        assert!(build_router(state).is_ok());
    }

    #[test]
    fn test_build_router_rejects_bad_header() {
        let config = Config {
            api_key_header: "bad header".to_string(),
            ..Config::default()
        };
        let result = build_router(AppState::new(config));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_build_cors_layer_specific() {
        let origins = vec![
            "https://example.com".to_string(),
            "https://app.example.com".to_string(),
        ];
        let _layer = build_cors_layer(&origins);
    }
}
