//! Domain error model.

use thiserror::Error;

use crate::validation::ValidationError;

/// Result type used across the domain and service layers.
pub type DomainResult<T> = Result<T, DomainError>;

/// The kind of record an operation targeted.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Category,
    Product,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Category => "category",
            EntityKind::Product => "product",
        }
    }

    /// Fixed human-readable message returned to clients on a failed lookup.
    pub fn not_found_message(&self) -> &'static str {
        match self {
            EntityKind::Category => "Category not found",
            EntityKind::Product => "Product not found",
        }
    }
}

impl core::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain-level error.
///
/// Keep this focused on deterministic failures a caller can act on (bad input,
/// unknown ids, broken references). Storage failures are carried as an opaque
/// message in `Store`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The inbound payload violated one or more structural constraints.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No record with the requested id exists.
    #[error("{}", .0.not_found_message())]
    NotFound(EntityKind),

    /// A write referenced a record that does not exist (foreign key).
    #[error("constraint violated: {0}")]
    ConstraintViolation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// The backing store failed.
    #[error("store failure: {0}")]
    Store(String),
}

impl DomainError {
    pub fn not_found(kind: EntityKind) -> Self {
        Self::NotFound(kind)
    }

    pub fn constraint(msg: impl Into<String>) -> Self {
        Self::ConstraintViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }
}
