use std::str::FromStr;

use catalog_core::{DomainError, Entity, Timestamps};
use catalog_domain::{Category, Product};

use crate::app::errors;

// -------------------------
// Path ids
// -------------------------

/// Parse a path segment into a typed id, or produce the 422 response.
pub fn parse_id<I>(raw: &str) -> Result<I, axum::response::Response>
where
    I: FromStr<Err = DomainError>,
{
    raw.parse::<I>().map_err(errors::domain_error_to_response)
}

// -------------------------
// Response mapping
// -------------------------

pub fn category_to_json(category: &Category) -> serde_json::Value {
    let mut body = serde_json::json!({
        "id": category.id().as_i64(),
        "name": category.name(),
    });
    insert_timestamps(&mut body, category.timestamps());
    body
}

pub fn product_to_json(product: &Product) -> serde_json::Value {
    let mut body = serde_json::json!({
        "id": product.id().as_i64(),
        "name": product.name(),
        "description": product.description(),
        "price": product.price(),
        "category_id": product.category_id().as_i64(),
    });
    insert_timestamps(&mut body, product.timestamps());
    body
}

pub fn categories_to_json(categories: &[Category]) -> serde_json::Value {
    serde_json::Value::Array(categories.iter().map(category_to_json).collect())
}

pub fn products_to_json(products: &[Product]) -> serde_json::Value {
    serde_json::Value::Array(products.iter().map(product_to_json).collect())
}

fn insert_timestamps(body: &mut serde_json::Value, ts: &Timestamps) {
    if let Some(obj) = body.as_object_mut() {
        obj.insert("created_at".into(), ts.created_at().to_rfc3339().into());
        obj.insert("updated_at".into(), ts.updated_at().to_rfc3339().into());
    }
}
