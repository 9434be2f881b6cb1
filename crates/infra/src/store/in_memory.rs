use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use catalog_core::{CategoryId, Entity, EntityKind, ProductId};
use catalog_domain::{Category, NewCategory, NewProduct, Product, ProductFilter};

use super::{CategoryStore, ProductStore, StoreError};

#[derive(Debug, Default)]
struct State {
    categories: BTreeMap<CategoryId, Category>,
    products: BTreeMap<ProductId, Product>,
    // Last issued ids. Counters only grow, so deleted ids are never reissued.
    last_category_id: i64,
    last_product_id: i64,
}

impl State {
    fn ensure_category(&self, id: CategoryId) -> Result<(), StoreError> {
        if self.categories.contains_key(&id) {
            Ok(())
        } else {
            Err(StoreError::ConstraintViolation(format!(
                "category_id {id} does not reference an existing category"
            )))
        }
    }
}

fn lookup<E>(table: &BTreeMap<E::Id, E>, id: E::Id) -> Result<E, StoreError>
where
    E: Entity + Clone,
{
    table.get(&id).cloned().ok_or(StoreError::NotFound(E::KIND))
}

/// In-memory catalog store.
///
/// Intended for tests/dev. Ordered maps keep listings in ascending id order.
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    state: RwLock<State>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, State>, StoreError> {
        self.state
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, State>, StoreError> {
        self.state
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))
    }
}

#[async_trait]
impl CategoryStore for InMemoryCatalogStore {
    async fn create_category(&self, input: NewCategory) -> Result<Category, StoreError> {
        let mut state = self.write()?;
        state.last_category_id += 1;
        let id = CategoryId::from_i64(state.last_category_id);
        let category = Category::create(id, input, Utc::now());
        state.categories.insert(id, category.clone());
        Ok(category)
    }

    async fn get_category(&self, id: CategoryId) -> Result<Category, StoreError> {
        lookup(&self.read()?.categories, id)
    }

    async fn update_category(
        &self,
        id: CategoryId,
        input: NewCategory,
    ) -> Result<Category, StoreError> {
        let mut state = self.write()?;
        let category = state
            .categories
            .get_mut(&id)
            .ok_or(StoreError::NotFound(EntityKind::Category))?;
        category.replace(input, Utc::now());
        Ok(category.clone())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        Ok(self.read()?.categories.values().cloned().collect())
    }
}

#[async_trait]
impl ProductStore for InMemoryCatalogStore {
    async fn create_product(&self, input: NewProduct) -> Result<Product, StoreError> {
        let mut state = self.write()?;
        state.ensure_category(input.category_id())?;

        state.last_product_id += 1;
        let id = ProductId::from_i64(state.last_product_id);
        let product = Product::create(id, input, Utc::now());
        state.products.insert(id, product.clone());
        Ok(product)
    }

    async fn get_product(&self, id: ProductId) -> Result<Product, StoreError> {
        lookup(&self.read()?.products, id)
    }

    async fn update_product(
        &self,
        id: ProductId,
        input: NewProduct,
    ) -> Result<Product, StoreError> {
        let mut state = self.write()?;
        if !state.products.contains_key(&id) {
            return Err(StoreError::NotFound(EntityKind::Product));
        }
        // Checked before mutating so a rejected update leaves the record untouched.
        state.ensure_category(input.category_id())?;

        let product = state
            .products
            .get_mut(&id)
            .ok_or(StoreError::NotFound(EntityKind::Product))?;
        product.replace(input, Utc::now());
        Ok(product.clone())
    }

    async fn delete_product(&self, id: ProductId) -> Result<Product, StoreError> {
        self.write()?
            .products
            .remove(&id)
            .ok_or(StoreError::NotFound(EntityKind::Product))
    }

    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, StoreError> {
        let clauses = filter.clauses();
        Ok(self
            .read()?
            .products
            .values()
            .filter(|p| clauses.iter().all(|c| c.matches(p)))
            .cloned()
            .collect())
    }

    async fn list_products_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, StoreError> {
        let state = self.read()?;
        if !state.categories.contains_key(&category_id) {
            return Err(StoreError::NotFound(EntityKind::Category));
        }
        Ok(state
            .products
            .values()
            .filter(|p| p.category_id() == category_id)
            .cloned()
            .collect())
    }
}
