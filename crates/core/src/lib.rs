//! `catalog-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! typed identifiers, store-assigned timestamps, the error model and the
//! violation collector used by payload validation.

pub mod entity;
pub mod error;
pub mod id;
pub mod validation;

pub use entity::{Entity, Timestamps};
pub use error::{DomainError, DomainResult, EntityKind};
pub use id::{CategoryId, ProductId};
pub use validation::{ValidationError, Validator, Violation, ViolationKind};
