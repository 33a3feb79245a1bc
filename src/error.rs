use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Generic message returned for every server-side failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// Application-wide error types with appropriate HTTP status codes.
///
/// Client errors carry a message that is safe to show to the caller.
/// Server errors keep their detail for the logs only; the response body is
/// always the generic [`INTERNAL_ERROR_MESSAGE`].
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    NotFound(String),

    #[error("Request body too large")]
    PayloadTooLarge,

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Shorthand for the 404 returned when a product id is unknown.
    pub fn product_not_found() -> Self {
        AppError::NotFound("Product not found".to_string())
    }

    /// HTTP status this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) | AppError::BadRequest(_) | AppError::Serialization(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Internal(_) | AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body for API endpoints.
///
/// Every error the service emits has exactly this shape.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Log the full error details server-side for debugging
        // but only expose sanitized messages to clients
        let message = match &self {
            AppError::Internal(_) | AppError::Config(_) => {
                tracing::error!(error = %self, "Request failed");
                INTERNAL_ERROR_MESSAGE.to_string()
            }
            AppError::Serialization(e) => {
                tracing::warn!(error = %e, "Rejected request payload");
                sanitize_serde_error(e)
            }
            other => {
                tracing::warn!(status = status.as_u16(), error = %other, "Request rejected");
                other.to_string()
            }
        };

        (status, axum::Json(ErrorResponse::new(message))).into_response()
    }
}

/// Sanitize serde error messages to avoid leaking internal type information.
///
/// Serde errors can contain internal struct/field names which shouldn't be
/// exposed to external clients. This function extracts the useful parts.
pub fn sanitize_serde_error(e: &serde_json::Error) -> String {
    let msg = e.to_string();

    if msg.contains("missing field")
        && let Some(start) = msg.find('`')
        && let Some(end) = msg[start + 1..].find('`')
    {
        let field = &msg[start + 1..start + 1 + end];
        return format!("Missing required field: {field}");
    }

    if msg.contains("invalid type") {
        return "Invalid data type in request body".to_string();
    }

    if e.is_eof() || e.is_syntax() {
        return "Malformed JSON in request body".to_string();
    }

    "Invalid request format".to_string()
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
