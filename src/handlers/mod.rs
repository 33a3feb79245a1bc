mod health;
pub mod products;
mod root;

pub use health::health_check;
pub use products::{create_product, delete_product, get_product, list_products, update_product};
pub use root::{WELCOME_MESSAGE, route_not_found, welcome};
