//! Root and fallback endpoints.

use crate::error::AppError;

/// Body of `GET /`.
pub const WELCOME_MESSAGE: &str =
    "Welcome to the Product API! Go to /api/products to see all products.";

/// Static welcome page.
pub async fn welcome() -> &'static str {
    WELCOME_MESSAGE
}

/// Fallback for paths no route matches.
pub async fn route_not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}
