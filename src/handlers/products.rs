//! Product CRUD endpoints under `/api/products`.
//!
//! By the time these run, the API key has been checked and write bodies have
//! passed [`validate_product_payload`](crate::middleware::validate_product_payload).

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::{info, instrument, warn};

use crate::error::{AppError, AppResult};
use crate::extract::Payload;
use crate::metrics;
use crate::models::{NewProduct, Product, ProductPatch};
use crate::state::AppState;

/// List all products in insertion order.
#[instrument(skip(state))]
pub async fn list_products(State(state): State<AppState>) -> Json<Vec<Product>> {
    Json(state.store.list())
}

/// Get a single product by id.
#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    state.store.get(&id).map(Json).ok_or_else(|| {
        warn!(id = %id, "Product not found");
        AppError::product_not_found()
    })
}

/// Create a product with a server-assigned id.
#[instrument(skip(state, payload))]
pub async fn create_product(
    State(state): State<AppState>,
    Payload(payload): Payload<NewProduct>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let change = state.store.insert(Product::create(payload))?;

    info!(id = %change.product.id, name = %change.product.name, "Product created");
    metrics::record_product_change("create", change.len);

    Ok((StatusCode::CREATED, Json(change.product)))
}

/// Merge the supplied fields over an existing product.
#[instrument(skip(state, patch))]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Payload(patch): Payload<ProductPatch>,
) -> AppResult<Json<Product>> {
    let change = state.store.update(&id, patch).ok_or_else(|| {
        warn!(id = %id, "Product not found");
        AppError::product_not_found()
    })?;

    info!(id = %change.product.id, "Product updated");
    metrics::record_product_change("update", change.len);

    Ok(Json(change.product))
}

/// Remove a product.
#[instrument(skip(state))]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let Some(change) = state.store.delete(&id) else {
        warn!(id = %id, "Product not found");
        return Err(AppError::product_not_found());
    };

    info!(id = %id, "Product deleted");
    metrics::record_product_change("delete", change.len);

    Ok(StatusCode::NO_CONTENT)
}
