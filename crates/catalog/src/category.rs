use chrono::{DateTime, Utc};
use serde::Deserialize;

use catalog_core::{CategoryId, Entity, EntityKind, Timestamps, ValidationError, Validator};

pub const CATEGORY_NAME_MAX: usize = 100;

/// Category body as decoded from a request; every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CategoryPayload {
    #[serde(default)]
    pub name: Option<String>,
}

impl CategoryPayload {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    /// Check every constraint and produce the validated field set.
    pub fn validate(self) -> Result<NewCategory, ValidationError> {
        let mut v = Validator::new();
        let name = v.text("name", self.name, CATEGORY_NAME_MAX);

        match name {
            Some(name) => Ok(NewCategory { name }),
            None => Err(v.into_error()),
        }
    }
}

/// Validated, client-settable category fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    name: String,
}

impl NewCategory {
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Stored category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    id: CategoryId,
    name: String,
    timestamps: Timestamps,
}

impl Category {
    /// Materialize a freshly created record.
    pub fn create(id: CategoryId, fields: NewCategory, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: fields.name,
            timestamps: Timestamps::new(now),
        }
    }

    /// Rebuild from persisted values.
    pub fn from_parts(id: CategoryId, name: String, timestamps: Timestamps) -> Self {
        Self {
            id,
            name,
            timestamps,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn timestamps(&self) -> &Timestamps {
        &self.timestamps
    }

    /// Full replacement of every mutable field.
    pub fn replace(&mut self, fields: NewCategory, now: DateTime<Utc>) {
        self.name = fields.name;
        self.timestamps.touch(now);
    }
}

impl Entity for Category {
    type Id = CategoryId;
    const KIND: EntityKind = EntityKind::Category;

    fn id(&self) -> Self::Id {
        self.id
    }
}
