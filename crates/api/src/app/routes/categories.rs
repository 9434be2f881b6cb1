use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use catalog_core::CategoryId;
use catalog_domain::CategoryPayload;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/", get(list_categories).post(create_category))
        .route("/categories/:id", get(get_category).put(update_category))
        .route("/categories/:id/products", get(list_category_products))
}

pub async fn create_category(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<CategoryPayload>, JsonRejection>,
) -> axum::response::Response {
    let Json(payload) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection(rejection),
    };

    match services.create_category(payload).await {
        Ok(category) => Json(dto::category_to_json(&category)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_category(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match dto::parse_id::<CategoryId>(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };

    match services.get_category(id).await {
        Ok(category) => Json(dto::category_to_json(&category)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_category(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<CategoryPayload>, JsonRejection>,
) -> axum::response::Response {
    let id = match dto::parse_id::<CategoryId>(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    let Json(payload) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection(rejection),
    };

    match services.update_category(id, payload).await {
        Ok(category) => Json(dto::category_to_json(&category)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_categories(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.list_categories().await {
        Ok(categories) => Json(dto::categories_to_json(&categories)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_category_products(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match dto::parse_id::<CategoryId>(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };

    match services.list_category_products(id).await {
        Ok(products) => Json(dto::products_to_json(&products)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
