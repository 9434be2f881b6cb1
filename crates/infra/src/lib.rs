//! Infrastructure layer: entity stores (in-memory, Postgres) and the catalog
//! service that sits between the HTTP layer and a store.

pub mod catalog_service;
pub mod store;

pub use catalog_service::CatalogService;
pub use store::{
    CategoryStore, InMemoryCatalogStore, PostgresCatalogStore, ProductStore, StoreError,
};
