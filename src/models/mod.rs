mod api;
mod product;

pub use api::HealthResponse;
pub use product::{NewProduct, Product, ProductPatch, price, seed_products};
