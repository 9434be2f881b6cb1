//! Entity store abstractions.
//!
//! Two implementations share these traits: `InMemoryCatalogStore` for dev/tests
//! and `PostgresCatalogStore` for persistent deployments. Both list records in
//! ascending id order, which equals creation order.

pub mod in_memory;
pub mod postgres;
pub mod schema;

pub use in_memory::InMemoryCatalogStore;
pub use postgres::PostgresCatalogStore;
pub use schema::ensure_schema;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use catalog_core::{CategoryId, DomainError, EntityKind, ProductId};
use catalog_domain::{Category, NewCategory, NewProduct, Product, ProductFilter};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(EntityKind),

    /// A foreign key (or other integrity constraint) rejected the write.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("backend error: {0}")]
    Backend(String),
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(kind) => DomainError::not_found(kind),
            StoreError::ConstraintViolation(msg) => DomainError::constraint(msg),
            StoreError::Backend(msg) => DomainError::store(msg),
        }
    }
}

/// Category persistence.
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Assign id + timestamps and persist.
    async fn create_category(&self, input: NewCategory) -> Result<Category, StoreError>;

    async fn get_category(&self, id: CategoryId) -> Result<Category, StoreError>;

    /// Replace every mutable field and refresh `updated_at`.
    async fn update_category(
        &self,
        id: CategoryId,
        input: NewCategory,
    ) -> Result<Category, StoreError>;

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError>;
}

/// Product persistence. Writes must reject a `category_id` with no category.
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn create_product(&self, input: NewProduct) -> Result<Product, StoreError>;

    async fn get_product(&self, id: ProductId) -> Result<Product, StoreError>;

    async fn update_product(&self, id: ProductId, input: NewProduct)
    -> Result<Product, StoreError>;

    /// Remove the product and return its last state.
    async fn delete_product(&self, id: ProductId) -> Result<Product, StoreError>;

    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, StoreError>;

    /// Products referencing `category_id`; `NotFound(Category)` if the category is absent.
    async fn list_products_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, StoreError>;
}

#[async_trait]
impl<S> CategoryStore for Arc<S>
where
    S: CategoryStore + ?Sized,
{
    async fn create_category(&self, input: NewCategory) -> Result<Category, StoreError> {
        (**self).create_category(input).await
    }

    async fn get_category(&self, id: CategoryId) -> Result<Category, StoreError> {
        (**self).get_category(id).await
    }

    async fn update_category(
        &self,
        id: CategoryId,
        input: NewCategory,
    ) -> Result<Category, StoreError> {
        (**self).update_category(id, input).await
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        (**self).list_categories().await
    }
}

#[async_trait]
impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    async fn create_product(&self, input: NewProduct) -> Result<Product, StoreError> {
        (**self).create_product(input).await
    }

    async fn get_product(&self, id: ProductId) -> Result<Product, StoreError> {
        (**self).get_product(id).await
    }

    async fn update_product(
        &self,
        id: ProductId,
        input: NewProduct,
    ) -> Result<Product, StoreError> {
        (**self).update_product(id, input).await
    }

    async fn delete_product(&self, id: ProductId) -> Result<Product, StoreError> {
        (**self).delete_product(id).await
    }

    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, StoreError> {
        (**self).list_products(filter).await
    }

    async fn list_products_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, StoreError> {
        (**self).list_products_by_category(category_id).await
    }
}
