//! Resource service: validation + store orchestration for both resources.
//!
//! ```text
//! raw payload
//!   ↓
//! 1. Validate (every violated constraint collected, nothing stored on failure)
//!   ↓
//! 2. Single store call (foreign keys enforced by the store)
//!   ↓
//! stored record | DomainError
//! ```
//!
//! This module contains no IO itself; it composes the store traits.

use tracing::{info, instrument};

use catalog_core::{CategoryId, DomainResult, Entity, ProductId};
use catalog_domain::{Category, CategoryPayload, Product, ProductFilter, ProductPayload};

use crate::store::{CategoryStore, ProductStore};

/// CRUD operations for categories and products over any store.
#[derive(Debug, Clone)]
pub struct CatalogService<S> {
    store: S,
}

impl<S> CatalogService<S>
where
    S: CategoryStore + ProductStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    #[instrument(skip(self, payload), err)]
    pub async fn create_category(&self, payload: CategoryPayload) -> DomainResult<Category> {
        let input = payload.validate()?;
        let category = self.store.create_category(input).await?;
        info!(category_id = %category.id(), "category created");
        Ok(category)
    }

    pub async fn get_category(&self, id: CategoryId) -> DomainResult<Category> {
        Ok(self.store.get_category(id).await?)
    }

    /// Full replacement; the payload is validated before the id is looked up.
    #[instrument(skip(self, payload), fields(category_id = %id), err)]
    pub async fn update_category(
        &self,
        id: CategoryId,
        payload: CategoryPayload,
    ) -> DomainResult<Category> {
        let input = payload.validate()?;
        let category = self.store.update_category(id, input).await?;
        info!("category updated");
        Ok(category)
    }

    pub async fn list_categories(&self) -> DomainResult<Vec<Category>> {
        Ok(self.store.list_categories().await?)
    }

    /// Products of one category, fetched on demand through the foreign key.
    pub async fn list_category_products(&self, id: CategoryId) -> DomainResult<Vec<Product>> {
        Ok(self.store.list_products_by_category(id).await?)
    }

    #[instrument(skip(self, payload), err)]
    pub async fn create_product(&self, payload: ProductPayload) -> DomainResult<Product> {
        let input = payload.validate()?;
        let product = self.store.create_product(input).await?;
        info!(
            product_id = %product.id(),
            category_id = %product.category_id(),
            "product created"
        );
        Ok(product)
    }

    pub async fn get_product(&self, id: ProductId) -> DomainResult<Product> {
        Ok(self.store.get_product(id).await?)
    }

    /// Full replacement; the payload is validated before the id is looked up.
    #[instrument(skip(self, payload), fields(product_id = %id), err)]
    pub async fn update_product(
        &self,
        id: ProductId,
        payload: ProductPayload,
    ) -> DomainResult<Product> {
        let input = payload.validate()?;
        let product = self.store.update_product(id, input).await?;
        info!("product updated");
        Ok(product)
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    pub async fn delete_product(&self, id: ProductId) -> DomainResult<Product> {
        let product = self.store.delete_product(id).await?;
        info!("product deleted");
        Ok(product)
    }

    pub async fn list_products(&self, filter: &ProductFilter) -> DomainResult<Vec<Product>> {
        Ok(self.store.list_products(filter).await?)
    }
}
