//! Product storage.
//!
//! Handlers only see the [`ProductStore`] trait; the process runs with
//! [`InMemoryProductStore`], which keeps everything in memory for the
//! lifetime of the process.
//!
//! # Ordering
//!
//! Listing returns products in insertion order. Updating a product keeps
//! its position; deleting one removes it without disturbing the others.
//!
//! # Thread Safety
//!
//! The in-memory store guards its maps with a single `parking_lot::RwLock`.
//! Every operation takes the lock once and releases it before returning, so
//! each call is atomic with respect to concurrent requests and the lock is
//! never held across an `.await`.

use std::collections::{BTreeMap, HashMap};

use parking_lot::RwLock;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::{Product, ProductPatch, seed_products};

/// Outcome of a write: the affected record and the catalog size right after
/// the write, read under the same lock.
#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    pub product: Product,
    pub len: usize,
}

/// Access operations over the product catalog.
pub trait ProductStore: Send + Sync {
    /// All products in insertion order.
    fn list(&self) -> Vec<Product>;

    /// Look up a product by exact id.
    fn get(&self, id: &str) -> Option<Product>;

    /// Append a product.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Internal` if the id is already taken.
    fn insert(&self, product: Product) -> AppResult<Change>;

    /// Merge `patch` over the product with `id`, returning the updated record.
    fn update(&self, id: &str, patch: ProductPatch) -> Option<Change>;

    /// Remove the product with `id`, returning it if it existed.
    fn delete(&self, id: &str) -> Option<Change>;

    /// Number of stored products.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Default)]
struct Inner {
    /// Products keyed by insertion sequence
    by_seq: BTreeMap<u64, Product>,
    /// id -> insertion sequence
    index: HashMap<String, u64>,
    next_seq: u64,
}

/// In-memory [`ProductStore`] with O(1) id lookup and stable ordering.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    inner: RwLock<Inner>,
}

impl InMemoryProductStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the seed catalog.
    pub fn seeded() -> Self {
        Self::from_products(seed_products())
    }

    /// Create a store holding `products` in the given order.
    ///
    /// Later duplicates of an id are skipped.
    pub fn from_products(products: impl IntoIterator<Item = Product>) -> Self {
        let store = Self::new();
        {
            let mut inner = store.inner.write();
            for product in products {
                if inner.index.contains_key(&product.id) {
                    debug!(id = %product.id, "Skipping duplicate product id");
                    continue;
                }
                inner.push(product);
            }
        }
        store
    }
}

impl Inner {
    fn push(&mut self, product: Product) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.index.insert(product.id.clone(), seq);
        self.by_seq.insert(seq, product);
    }
}

impl ProductStore for InMemoryProductStore {
    fn list(&self) -> Vec<Product> {
        self.inner.read().by_seq.values().cloned().collect()
    }

    fn get(&self, id: &str) -> Option<Product> {
        let inner = self.inner.read();
        let seq = inner.index.get(id)?;
        inner.by_seq.get(seq).cloned()
    }

    fn insert(&self, product: Product) -> AppResult<Change> {
        let mut inner = self.inner.write();
        if inner.index.contains_key(&product.id) {
            return Err(AppError::Internal(format!(
                "product id '{}' already exists",
                product.id
            )));
        }
        inner.push(product.clone());
        Ok(Change {
            product,
            len: inner.index.len(),
        })
    }

    fn update(&self, id: &str, patch: ProductPatch) -> Option<Change> {
        let mut inner = self.inner.write();
        let seq = *inner.index.get(id)?;
        let len = inner.index.len();
        let product = inner.by_seq.get_mut(&seq)?;
        product.apply(patch);
        Some(Change {
            product: product.clone(),
            len,
        })
    }

    fn delete(&self, id: &str) -> Option<Change> {
        let mut inner = self.inner.write();
        let seq = inner.index.remove(id)?;
        let product = inner.by_seq.remove(&seq)?;
        Some(Change {
            product,
            len: inner.index.len(),
        })
    }

    fn len(&self) -> usize {
        self.inner.read().index.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::models::NewProduct;
    use rust_decimal::Decimal;

    fn new_product(name: &str) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            description: "Wireless".to_string(),
            price: Decimal::from(25),
            category: "electronics".to_string(),
            in_stock: None,
        }
    }

    fn ids(store: &InMemoryProductStore) -> Vec<String> {
        store.list().into_iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_seeded_store() {
        let store = InMemoryProductStore::seeded();
        assert_eq!(store.len(), 3);
        assert_eq!(ids(&store), vec!["1", "2", "3"]);
        assert_eq!(store.get("1").unwrap().name, "Laptop");
    }

    #[test]
    fn test_get_is_exact_match() {
        let store = InMemoryProductStore::seeded();
        assert!(store.get("01").is_none());
        assert!(store.get("1 ").is_none());
        assert!(store.get("").is_none());
    }

    #[test]
    fn test_insert_appends() {
        let store = InMemoryProductStore::seeded();
        let change = store.insert(Product::create(new_product("Mouse"))).unwrap();
        let created = change.product;

        assert_eq!(change.len, 4);
        assert_eq!(store.len(), 4);
        assert_eq!(ids(&store).last(), Some(&created.id));
        assert_eq!(store.get(&created.id), Some(created));
    }

    #[test]
    fn test_insert_duplicate_id_rejected() {
        let store = InMemoryProductStore::seeded();
        let result = store.insert(Product::with_id("2", new_product("Clone")));

        assert!(matches!(result, Err(AppError::Internal(_))));
        assert_eq!(store.len(), 3);
        assert_eq!(store.get("2").unwrap().name, "Smartphone");
    }

    #[test]
    fn test_update_keeps_position() {
        let store = InMemoryProductStore::seeded();
        let updated = store
            .update(
                "2",
                ProductPatch {
                    name: Some("Phone".to_string()),
                    ..ProductPatch::default()
                },
            )
            .unwrap();

        assert_eq!(updated.len, 3);
        let updated = updated.product;
        assert_eq!(updated.name, "Phone");
        assert_eq!(updated.description, "Latest model with 128GB storage");
        assert_eq!(ids(&store), vec!["1", "2", "3"]);
        assert_eq!(store.get("2").unwrap().name, "Phone");
    }

    #[test]
    fn test_update_unknown_id() {
        let store = InMemoryProductStore::seeded();
        assert!(store.update("nope", ProductPatch::default()).is_none());
    }

    #[test]
    fn test_delete_preserves_remaining_order() {
        let store = InMemoryProductStore::seeded();
        let removed = store.delete("2").unwrap();

        assert_eq!(removed.product.name, "Smartphone");
        assert_eq!(removed.len, 2);
        assert_eq!(ids(&store), vec!["1", "3"]);
        assert!(store.get("2").is_none());
        assert!(store.delete("2").is_none());
    }

    #[test]
    fn test_reinsert_after_delete_goes_last() {
        let store = InMemoryProductStore::seeded();
        let laptop = store.delete("1").unwrap().product;
        store.insert(laptop).unwrap();

        assert_eq!(ids(&store), vec!["2", "3", "1"]);
    }

    #[test]
    fn test_from_products_skips_duplicates() {
        let store = InMemoryProductStore::from_products(vec![
            Product::with_id("a", new_product("First")),
            Product::with_id("a", new_product("Second")),
        ]);

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("a").unwrap().name, "First");
    }

    #[test]
    fn test_empty_store() {
        let store = InMemoryProductStore::new();
        assert!(store.is_empty());
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_concurrent_inserts() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(InMemoryProductStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for j in 0..50 {
                        store
                            .insert(Product::create(new_product(&format!("p{i}-{j}"))))
                            .unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.len(), 400);
        assert_eq!(store.list().len(), 400);
    }
}
