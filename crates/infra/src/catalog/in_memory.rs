//! In-memory catalog store for tests/dev.

use std::collections::BTreeMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use pricegate_core::ProductId;
use pricegate_products::Product;

use super::{CatalogError, CatalogStore};

#[derive(Debug)]
pub struct InMemoryCatalogStore {
    products: RwLock<BTreeMap<ProductId, Product>>,
    next_id: AtomicU64,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self {
            products: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Seed the store with existing products (ids are kept as given).
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let store = Self::new();
        if let Ok(mut map) = store.products.write() {
            for p in products {
                store.next_id.fetch_max(p.id.get() + 1, Ordering::SeqCst);
                map.insert(p.id, p);
            }
        }
        store
    }

    pub fn len(&self) -> Result<usize, CatalogError> {
        let map = self.products.read().map_err(|_| poisoned())?;
        Ok(map.len())
    }

    pub fn is_empty(&self) -> Result<bool, CatalogError> {
        Ok(self.len()? == 0)
    }
}

impl Default for InMemoryCatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> CatalogError {
    CatalogError::Storage("catalog lock poisoned".to_string())
}

impl CatalogStore for InMemoryCatalogStore {
    fn allocate_id(&self) -> Result<ProductId, CatalogError> {
        Ok(ProductId::new(self.next_id.fetch_add(1, Ordering::SeqCst)))
    }

    fn list(&self) -> Result<Vec<Product>, CatalogError> {
        let map = self.products.read().map_err(|_| poisoned())?;
        Ok(map.values().cloned().collect())
    }

    fn get(&self, id: ProductId) -> Result<Option<Product>, CatalogError> {
        let map = self.products.read().map_err(|_| poisoned())?;
        Ok(map.get(&id).cloned())
    }

    fn insert(&self, product: Product) -> Result<(), CatalogError> {
        let mut map = self.products.write().map_err(|_| poisoned())?;
        if map.contains_key(&product.id) {
            return Err(CatalogError::AlreadyExists(product.id));
        }
        // Keep the allocator ahead of explicitly chosen ids.
        self.next_id.fetch_max(product.id.get() + 1, Ordering::SeqCst);
        map.insert(product.id, product);
        Ok(())
    }

    fn replace(&self, id: ProductId, mut product: Product) -> Result<(), CatalogError> {
        let mut map = self.products.write().map_err(|_| poisoned())?;
        let slot = map.get_mut(&id).ok_or(CatalogError::NotFound(id))?;
        product.id = id;
        *slot = product;
        Ok(())
    }

    fn delete(&self, id: ProductId) -> Result<(), CatalogError> {
        let mut map = self.products.write().map_err(|_| poisoned())?;
        map.remove(&id).map(|_| ()).ok_or(CatalogError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    use pricegate_products::{Decimal, ProductDetails};

    fn product(id: u64, price: i64) -> Product {
        Product::new(
            ProductId::new(id),
            ProductDetails::new(format!("Product {id}"), Decimal::new(price, 0)),
        )
    }

    #[test]
    fn allocated_ids_are_unique_and_increasing() {
        let store = InMemoryCatalogStore::new();
        let a = store.allocate_id().unwrap();
        let b = store.allocate_id().unwrap();
        assert!(b > a);
    }

    #[test]
    fn seeded_store_allocates_past_existing_ids() {
        let store = InMemoryCatalogStore::with_products([product(7, 10)]);
        assert_eq!(store.allocate_id().unwrap(), ProductId::new(8));
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn insert_get_list() {
        let store = InMemoryCatalogStore::new();
        store.insert(product(2, 20)).unwrap();
        store.insert(product(1, 10)).unwrap();

        assert_eq!(store.get(ProductId::new(1)).unwrap(), Some(product(1, 10)));
        assert_eq!(store.get(ProductId::new(3)).unwrap(), None);

        let ids: Vec<_> = store.list().unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![ProductId::new(1), ProductId::new(2)]);
    }

    #[test]
    fn insert_rejects_duplicate_id() {
        let store = InMemoryCatalogStore::new();
        store.insert(product(1, 10)).unwrap();
        assert_eq!(
            store.insert(product(1, 99)),
            Err(CatalogError::AlreadyExists(ProductId::new(1)))
        );
        assert_eq!(store.get(ProductId::new(1)).unwrap(), Some(product(1, 10)));
    }

    #[test]
    fn replace_requires_existing_record() {
        let store = InMemoryCatalogStore::new();
        assert_eq!(
            store.replace(ProductId::new(5), product(5, 1)),
            Err(CatalogError::NotFound(ProductId::new(5)))
        );

        store.insert(product(5, 1)).unwrap();
        store.replace(ProductId::new(5), product(99, 2)).unwrap();
        let stored = store.get(ProductId::new(5)).unwrap().unwrap();
        assert_eq!(stored.id, ProductId::new(5));
        assert_eq!(stored.price(), Decimal::new(2, 0));
    }

    #[test]
    fn delete_removes_record_once() {
        let store = InMemoryCatalogStore::with_products([product(1, 10)]);
        store.delete(ProductId::new(1)).unwrap();
        assert!(store.is_empty().unwrap());
        assert_eq!(
            store.delete(ProductId::new(1)),
            Err(CatalogError::NotFound(ProductId::new(1)))
        );
    }

    #[test]
    fn poisoned_lock_is_reported_as_storage_error() {
        let store = Arc::new(InMemoryCatalogStore::with_products([product(1, 10)]));
        let writer = store.clone();
        let _ = thread::spawn(move || {
            let _guard = writer.products.write().unwrap();
            panic!("writer died holding the catalog lock");
        })
        .join();

        assert!(matches!(store.len(), Err(CatalogError::Storage(_))));
        assert!(matches!(store.is_empty(), Err(CatalogError::Storage(_))));
        assert!(matches!(store.list(), Err(CatalogError::Storage(_))));
    }
}
