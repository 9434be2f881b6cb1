//! Entity trait: identity + continuity across state changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EntityKind;

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Ord + core::hash::Hash + core::fmt::Debug;

    /// Which resource this entity is; selects the not-found message.
    const KIND: EntityKind;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}

/// Store-assigned creation/modification timestamps.
///
/// `created_at` is fixed at construction; only `touch` moves `updated_at`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamps {
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Timestamps {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild from persisted values (e.g. a database row).
    pub fn from_parts(created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        Self {
            created_at,
            updated_at,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Record a mutation. `updated_at` never falls behind `created_at`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.created_at);
    }
}
