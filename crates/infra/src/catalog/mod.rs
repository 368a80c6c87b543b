//! Catalog store boundary.
//!
//! The approval workflow treats product storage as a key/value collaborator.
//! Anything implementing [`CatalogStore`] can back it; [`InMemoryCatalogStore`]
//! is the dev/test implementation.

pub mod in_memory;

use std::sync::Arc;

use thiserror::Error;

use pricegate_core::ProductId;
use pricegate_products::Product;

pub use in_memory::InMemoryCatalogStore;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("product not found: {0}")]
    NotFound(ProductId),

    #[error("product already exists: {0}")]
    AlreadyExists(ProductId),

    #[error("catalog storage error: {0}")]
    Storage(String),
}

/// Product storage used by the approval workflow.
pub trait CatalogStore: Send + Sync {
    /// Reserve a fresh product id. Ids are never handed out twice.
    fn allocate_id(&self) -> Result<ProductId, CatalogError>;

    /// All products, ordered by id.
    fn list(&self) -> Result<Vec<Product>, CatalogError>;

    fn get(&self, id: ProductId) -> Result<Option<Product>, CatalogError>;

    /// Insert a new product. Fails with `AlreadyExists` if the id is taken.
    fn insert(&self, product: Product) -> Result<(), CatalogError>;

    /// Replace the record stored under `id`. Fails with `NotFound` if absent.
    fn replace(&self, id: ProductId, product: Product) -> Result<(), CatalogError>;

    /// Remove the record stored under `id`. Fails with `NotFound` if absent.
    fn delete(&self, id: ProductId) -> Result<(), CatalogError>;
}

impl<S> CatalogStore for Arc<S>
where
    S: CatalogStore + ?Sized,
{
    fn allocate_id(&self) -> Result<ProductId, CatalogError> {
        (**self).allocate_id()
    }

    fn list(&self) -> Result<Vec<Product>, CatalogError> {
        (**self).list()
    }

    fn get(&self, id: ProductId) -> Result<Option<Product>, CatalogError> {
        (**self).get(id)
    }

    fn insert(&self, product: Product) -> Result<(), CatalogError> {
        (**self).insert(product)
    }

    fn replace(&self, id: ProductId, product: Product) -> Result<(), CatalogError> {
        (**self).replace(id, product)
    }

    fn delete(&self, id: ProductId) -> Result<(), CatalogError> {
        (**self).delete(id)
    }
}
