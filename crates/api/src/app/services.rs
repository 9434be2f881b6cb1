use std::sync::Arc;

use anyhow::Context;

use catalog_core::{CategoryId, DomainResult, ProductId};
use catalog_domain::{Category, CategoryPayload, Product, ProductFilter, ProductPayload};
use catalog_infra::{
    CatalogService, InMemoryCatalogStore, PostgresCatalogStore, store::ensure_schema,
};

use crate::config::{AppConfig, StoreBackend};

type InMemoryCatalog = CatalogService<Arc<InMemoryCatalogStore>>;
type PersistentCatalog = CatalogService<Arc<PostgresCatalogStore>>;

/// Service wiring shared by every handler, selected once at startup.
#[derive(Clone)]
pub enum AppServices {
    InMemory { catalog: Arc<InMemoryCatalog> },
    Persistent { catalog: Arc<PersistentCatalog> },
}

// Both variants expose the same `CatalogService` API over different stores.
macro_rules! with_catalog {
    ($services:expr, $catalog:ident => $body:expr) => {
        match $services {
            AppServices::InMemory { catalog: $catalog } => $body,
            AppServices::Persistent { catalog: $catalog } => $body,
        }
    };
}

/// Build services from configuration (connects and provisions the schema when persistent).
pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    match &config.store {
        StoreBackend::InMemory => {
            tracing::info!("using in-memory catalog store");
            Ok(AppServices::in_memory())
        }
        StoreBackend::Postgres {
            database_url,
            max_connections,
        } => {
            let store = PostgresCatalogStore::connect(database_url, *max_connections)
                .await
                .context("failed to connect to Postgres")?;
            ensure_schema(store.pool())
                .await
                .context("failed to provision catalog schema")?;
            tracing::info!(max_connections, "using Postgres catalog store");
            Ok(AppServices::persistent(store))
        }
    }
}

impl AppServices {
    /// In-memory wiring (dev/test).
    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryCatalogStore::new());
        AppServices::InMemory {
            catalog: Arc::new(CatalogService::new(store)),
        }
    }

    pub fn persistent(store: PostgresCatalogStore) -> Self {
        AppServices::Persistent {
            catalog: Arc::new(CatalogService::new(Arc::new(store))),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            AppServices::InMemory { .. } => "in_memory",
            AppServices::Persistent { .. } => "postgres",
        }
    }

    pub async fn create_category(&self, payload: CategoryPayload) -> DomainResult<Category> {
        with_catalog!(self, c => c.create_category(payload).await)
    }

    pub async fn get_category(&self, id: CategoryId) -> DomainResult<Category> {
        with_catalog!(self, c => c.get_category(id).await)
    }

    pub async fn update_category(
        &self,
        id: CategoryId,
        payload: CategoryPayload,
    ) -> DomainResult<Category> {
        with_catalog!(self, c => c.update_category(id, payload).await)
    }

    pub async fn list_categories(&self) -> DomainResult<Vec<Category>> {
        with_catalog!(self, c => c.list_categories().await)
    }

    pub async fn list_category_products(&self, id: CategoryId) -> DomainResult<Vec<Product>> {
        with_catalog!(self, c => c.list_category_products(id).await)
    }

    pub async fn create_product(&self, payload: ProductPayload) -> DomainResult<Product> {
        with_catalog!(self, c => c.create_product(payload).await)
    }

    pub async fn get_product(&self, id: ProductId) -> DomainResult<Product> {
        with_catalog!(self, c => c.get_product(id).await)
    }

    pub async fn update_product(
        &self,
        id: ProductId,
        payload: ProductPayload,
    ) -> DomainResult<Product> {
        with_catalog!(self, c => c.update_product(id, payload).await)
    }

    pub async fn delete_product(&self, id: ProductId) -> DomainResult<Product> {
        with_catalog!(self, c => c.delete_product(id).await)
    }

    pub async fn list_products(&self, filter: &ProductFilter) -> DomainResult<Vec<Product>> {
        with_catalog!(self, c => c.list_products(filter).await)
    }
}
