//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store selection and the catalog service handlers call into
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: JSON mapping helpers and path id parsing
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the black-box tests).
pub fn build_app(services: AppServices) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/api", routes::router())
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::request_logging))
                .layer(Extension(Arc::new(services))),
        )
}
