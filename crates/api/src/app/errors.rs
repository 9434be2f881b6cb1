use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use catalog_core::{DomainError, ValidationError};

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(v) => validation_error(&v),
        DomainError::NotFound(kind) => {
            json_error(StatusCode::NOT_FOUND, "not_found", kind.not_found_message())
        }
        DomainError::ConstraintViolation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "constraint_violation", msg)
        }
        DomainError::InvalidId(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invalid_id", msg)
        }
        DomainError::Store(msg) => {
            tracing::error!(error = %msg, "store failure");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "store_error",
                "internal storage error",
            )
        }
    }
}

/// Error body: `error` code, human `message`, and the same text under `detail`.
pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    let message = message.into();
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message,
            "detail": message,
        })),
    )
        .into_response()
}

/// 422 with one entry per violated field constraint.
pub fn validation_error(err: &ValidationError) -> axum::response::Response {
    let violations: Vec<_> = err
        .violations()
        .iter()
        .map(|v| {
            json!({
                "field": v.field,
                "kind": v.kind.code(),
                "message": v.message(),
            })
        })
        .collect();

    let message = err.to_string();
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        axum::Json(json!({
            "error": "validation_error",
            "message": message,
            "detail": message,
            "violations": violations,
        })),
    )
        .into_response()
}

pub fn json_rejection(rejection: JsonRejection) -> axum::response::Response {
    json_error(rejection.status(), "invalid_body", rejection.body_text())
}

pub fn query_rejection(rejection: QueryRejection) -> axum::response::Response {
    json_error(
        StatusCode::UNPROCESSABLE_ENTITY,
        "invalid_query",
        rejection.body_text(),
    )
}
