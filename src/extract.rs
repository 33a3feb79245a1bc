//! Typed access to the body parsed by the JSON body middleware.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use crate::error::AppError;
use crate::middleware::JsonBody;

/// Deserializes the request's [`JsonBody`] extension into `T`.
///
/// Rejects with 400 when no JSON body was sent or it does not fit `T`.
#[derive(Debug)]
pub struct Payload<T>(pub T);

impl<T, S> FromRequestParts<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let JsonBody(value) = parts
            .extensions
            .get::<JsonBody>()
            .cloned()
            .ok_or_else(|| AppError::BadRequest("Expected a JSON request body".to_string()))?;

        Ok(Payload(serde_json::from_value(value)?))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use axum::http::Request;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Sample {
        price: u32,
    }

    fn parts(body: Option<serde_json::Value>) -> Parts {
        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();
        if let Some(value) = body {
            parts.extensions.insert(JsonBody(value));
        }
        parts
    }

    #[tokio::test]
    async fn test_extracts_typed_payload() {
        let mut parts = parts(Some(json!({ "price": 5 })));
        let Payload(sample) = Payload::<Sample>::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(sample.price, 5);
    }

    #[tokio::test]
    async fn test_missing_body_rejected() {
        let mut parts = parts(None);
        let err = Payload::<Sample>::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_wrong_shape_rejected() {
        let mut parts = parts(Some(json!({ "price": "five" })));
        let err = Payload::<Sample>::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Serialization(_)));
    }
}
