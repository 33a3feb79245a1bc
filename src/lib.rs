//! # Product API
//!
//! An in-memory product catalog served over HTTP with Axum.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Axum HTTP Server                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Middleware (Panic → Log → CORS → API Key → JSON Body)      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Product validation (POST/PUT on /api/products)             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Handlers (welcome, health, products)                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ProductStore (in-memory, RwLock-guarded)                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use product_api::{AppState, Config, build_router};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let addr = config.server_addr();
//!     let app = build_router(AppState::new(config))?;
//!
//!     let listener = tokio::net::TcpListener::bind(addr).await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Calling the API
//!
//! ```bash
//! curl -H "X-API-Key: any-value" http://localhost:3000/api/products
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
pub mod utils;
pub mod validation;

// Re-exports for convenience
pub use config::Config;
pub use error::{AppError, AppResult};
pub use routes::build_router;
pub use state::AppState;
pub use store::{Change, InMemoryProductStore, ProductStore};
