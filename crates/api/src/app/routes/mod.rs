use axum::Router;

pub mod categories;
pub mod products;
pub mod system;

/// Router for the resource endpoints (mounted under `/api`).
pub fn router() -> Router {
    Router::new()
        .merge(categories::router())
        .merge(products::router())
}
