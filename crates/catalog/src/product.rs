use chrono::{DateTime, Utc};
use serde::Deserialize;

use catalog_core::{
    CategoryId, Entity, EntityKind, ProductId, Timestamps, ValidationError, Validator,
};

pub const PRODUCT_NAME_MAX: usize = 100;
pub const PRODUCT_DESCRIPTION_MAX: usize = 500;

/// Product body as decoded from a request; every field may be absent.
///
/// Updates use the same payload: every field must be resupplied.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProductPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub category_id: Option<i64>,
}

impl ProductPayload {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: f64,
        category_id: CategoryId,
    ) -> Self {
        Self {
            name: Some(name.into()),
            description: Some(description.into()),
            price: Some(price),
            category_id: Some(category_id.as_i64()),
        }
    }

    /// Check every constraint and produce the validated field set.
    ///
    /// Category existence is not checked here; the store enforces it on write.
    pub fn validate(self) -> Result<NewProduct, ValidationError> {
        let mut v = Validator::new();
        let name = v.text("name", self.name, PRODUCT_NAME_MAX);
        let description = v.text("description", self.description, PRODUCT_DESCRIPTION_MAX);
        let price = v.positive_f64("price", self.price);
        let category_id = v.positive_i64("category_id", self.category_id);

        match (name, description, price, category_id) {
            (Some(name), Some(description), Some(price), Some(category_id)) => Ok(NewProduct {
                name,
                description,
                price,
                category_id: CategoryId::from_i64(category_id),
            }),
            _ => Err(v.into_error()),
        }
    }
}

/// Validated, client-settable product fields.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    name: String,
    description: String,
    price: f64,
    category_id: CategoryId,
}

impl NewProduct {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn category_id(&self) -> CategoryId {
        self.category_id
    }
}

/// Stored product.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    id: ProductId,
    name: String,
    description: String,
    price: f64,
    category_id: CategoryId,
    timestamps: Timestamps,
}

impl Product {
    /// Materialize a freshly created record.
    pub fn create(id: ProductId, fields: NewProduct, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: fields.name,
            description: fields.description,
            price: fields.price,
            category_id: fields.category_id,
            timestamps: Timestamps::new(now),
        }
    }

    /// Rebuild from persisted values.
    pub fn from_parts(
        id: ProductId,
        name: String,
        description: String,
        price: f64,
        category_id: CategoryId,
        timestamps: Timestamps,
    ) -> Self {
        Self {
            id,
            name,
            description,
            price,
            category_id,
            timestamps,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn category_id(&self) -> CategoryId {
        self.category_id
    }

    pub fn timestamps(&self) -> &Timestamps {
        &self.timestamps
    }

    /// Full replacement of every mutable field.
    pub fn replace(&mut self, fields: NewProduct, now: DateTime<Utc>) {
        self.name = fields.name;
        self.description = fields.description;
        self.price = fields.price;
        self.category_id = fields.category_id;
        self.timestamps.touch(now);
    }
}

impl Entity for Product {
    type Id = ProductId;
    const KIND: EntityKind = EntityKind::Product;

    fn id(&self) -> Self::Id {
        self.id
    }
}
