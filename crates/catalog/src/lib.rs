//! Catalog domain module.
//!
//! This crate contains the records, payload validation and the product filter
//! predicate, implemented purely as deterministic domain logic (no IO, no HTTP,
//! no storage).

pub mod category;
pub mod filter;
pub mod product;

pub use category::{CATEGORY_NAME_MAX, Category, CategoryPayload, NewCategory};
pub use filter::{FilterClause, ProductFilter};
pub use product::{
    NewProduct, PRODUCT_DESCRIPTION_MAX, PRODUCT_NAME_MAX, Product, ProductPayload,
};
