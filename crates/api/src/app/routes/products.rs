use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Path, Query,
    },
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use catalog_core::ProductId;
use catalog_domain::{ProductFilter, ProductPayload};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/", get(list_products).post(create_product))
        .route(
            "/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<ProductPayload>, JsonRejection>,
) -> axum::response::Response {
    let Json(payload) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection(rejection),
    };

    match services.create_product(payload).await {
        Ok(product) => Json(dto::product_to_json(&product)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match dto::parse_id::<ProductId>(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };

    match services.get_product(id).await {
        Ok(product) => Json(dto::product_to_json(&product)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Full replacement: every field must be resupplied.
pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<ProductPayload>, JsonRejection>,
) -> axum::response::Response {
    let id = match dto::parse_id::<ProductId>(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    let Json(payload) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection(rejection),
    };

    match services.update_product(id, payload).await {
        Ok(product) => Json(dto::product_to_json(&product)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Responds with the record as it was just before removal.
pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match dto::parse_id::<ProductId>(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };

    match services.delete_product(id).await {
        Ok(product) => Json(dto::product_to_json(&product)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    filter: Result<Query<ProductFilter>, QueryRejection>,
) -> axum::response::Response {
    let Query(filter) = match filter {
        Ok(q) => q,
        Err(rejection) => return errors::query_rejection(rejection),
    };

    match services.list_products(&filter).await {
        Ok(products) => Json(dto::products_to_json(&products)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
