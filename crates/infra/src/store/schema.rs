//! Idempotent schema provisioning for the Postgres store.

use sqlx::PgPool;
use tracing::info;

use super::StoreError;
use super::postgres::map_sqlx_error;

/// DDL applied in order inside one transaction. Every statement is idempotent.
///
/// `products.category_id` carries no `ON DELETE` action; categories are never deleted.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS categories (
        id BIGSERIAL PRIMARY KEY,
        name VARCHAR(100) NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS products (
        id BIGSERIAL PRIMARY KEY,
        name VARCHAR(100) NOT NULL,
        description VARCHAR(500) NOT NULL,
        price DOUBLE PRECISION NOT NULL CHECK (price > 0),
        category_id BIGINT NOT NULL REFERENCES categories (id),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS products_category_id_idx ON products (category_id)",
];

/// Create the catalog tables if they do not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), StoreError> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| map_sqlx_error("ensure_schema", e))?;

    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
    }

    tx.commit()
        .await
        .map_err(|e| map_sqlx_error("ensure_schema", e))?;

    info!(statements = SCHEMA.len(), "catalog schema ensured");
    Ok(())
}
