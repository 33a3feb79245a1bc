//! HTTP middleware making up the request pipeline.
//!
//! # Architecture
//!
//! ```text
//! Request → Catch Panic → Log → CORS → API Key → JSON Body → [Validate] → Handler
//!                ↓                        ↓          ↓            ↓
//!           500 generic             401 Unauth   400 / 413    400 invalid
//! ```
//!
//! Validation is mounted only on the `/api/products` routes and only
//! checks `POST` and `PUT`. Every short-circuit response uses the
//! `{"error": "..."}` body shape.

pub mod auth;
pub mod body;
pub mod logging;
pub mod recover;
pub mod validate;

pub use auth::ApiKeyAuth;
pub use body::{JsonBody, JsonBodyLayer};
pub use logging::{REQUEST_ID_HEADER, RequestLogLayer};
pub use recover::catch_panic_layer;
pub use validate::validate_product_payload;
