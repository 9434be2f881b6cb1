//! Postgres-backed catalog store.
//!
//! Every operation is a single SQL statement, so each write is atomic on its
//! own and no explicit transaction is needed. Price bounds are pushed into SQL
//! with the `($n IS NULL OR ...)` pattern so one prepared statement covers every
//! combination; the name clause is applied to the fetched rows with the same
//! predicate the in-memory store uses.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (foreign key violation) | `23503` | `ConstraintViolation` |
//! | Database (check constraint violation) | `23514` | `ConstraintViolation` |
//! | Database (other) | Any other | `Backend` |
//! | PoolClosed / RowNotFound / Other | N/A | `Backend` |

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{FromRow, PgPool, Row};
use tracing::{Span, instrument};

use catalog_core::{CategoryId, EntityKind, ProductId, Timestamps};
use catalog_domain::{Category, NewCategory, NewProduct, Product, ProductFilter};

use super::{CategoryStore, ProductStore, StoreError};

const CATEGORY_COLUMNS: &str = "id, name, created_at, updated_at";
const PRODUCT_COLUMNS: &str = "id, name, description, price, category_id, created_at, updated_at";

/// Postgres-backed store for categories and products.
///
/// Uses the SQLx connection pool, which is `Send + Sync` and cheap to clone.
#[derive(Debug, Clone)]
pub struct PostgresCatalogStore {
    pool: Arc<PgPool>,
}

impl PostgresCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Open a pool against `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl CategoryStore for PostgresCatalogStore {
    #[instrument(skip(self, input), err)]
    async fn create_category(&self, input: NewCategory) -> Result<Category, StoreError> {
        let row = sqlx::query(&format!(
            "INSERT INTO categories (name) VALUES ($1) RETURNING {CATEGORY_COLUMNS}"
        ))
        .bind(input.name())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_category", e))?;

        category_from_row(&row)
    }

    #[instrument(skip(self), fields(category_id = %id), err)]
    async fn get_category(&self, id: CategoryId) -> Result<Category, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1"
        ))
        .bind(id.as_i64())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_category", e))?
        .ok_or(StoreError::NotFound(EntityKind::Category))?;

        category_from_row(&row)
    }

    #[instrument(skip(self, input), fields(category_id = %id), err)]
    async fn update_category(
        &self,
        id: CategoryId,
        input: NewCategory,
    ) -> Result<Category, StoreError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE categories
            SET name = $2,
                updated_at = GREATEST(NOW(), created_at)
            WHERE id = $1
            RETURNING {CATEGORY_COLUMNS}
            "#
        ))
        .bind(id.as_i64())
        .bind(input.name())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_category", e))?
        .ok_or(StoreError::NotFound(EntityKind::Category))?;

        category_from_row(&row)
    }

    #[instrument(skip(self), fields(row_count = tracing::field::Empty), err)]
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY id ASC"
        ))
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_categories", e))?;

        let categories = rows
            .iter()
            .map(category_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Span::current().record("row_count", categories.len());
        Ok(categories)
    }
}

#[async_trait]
impl ProductStore for PostgresCatalogStore {
    #[instrument(skip(self, input), fields(category_id = %input.category_id()), err)]
    async fn create_product(&self, input: NewProduct) -> Result<Product, StoreError> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO products (name, description, price, category_id)
            VALUES ($1, $2, $3, $4)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(input.name())
        .bind(input.description())
        .bind(input.price())
        .bind(input.category_id().as_i64())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_product", e))?;

        product_from_row(&row)
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    async fn get_product(&self, id: ProductId) -> Result<Product, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id.as_i64())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_product", e))?
        .ok_or(StoreError::NotFound(EntityKind::Product))?;

        product_from_row(&row)
    }

    #[instrument(skip(self, input), fields(product_id = %id), err)]
    async fn update_product(
        &self,
        id: ProductId,
        input: NewProduct,
    ) -> Result<Product, StoreError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE products
            SET name = $2,
                description = $3,
                price = $4,
                category_id = $5,
                updated_at = GREATEST(NOW(), created_at)
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(id.as_i64())
        .bind(input.name())
        .bind(input.description())
        .bind(input.price())
        .bind(input.category_id().as_i64())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_product", e))?
        .ok_or(StoreError::NotFound(EntityKind::Product))?;

        product_from_row(&row)
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    async fn delete_product(&self, id: ProductId) -> Result<Product, StoreError> {
        let row = sqlx::query(&format!(
            "DELETE FROM products WHERE id = $1 RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id.as_i64())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("delete_product", e))?
        .ok_or(StoreError::NotFound(EntityKind::Product))?;

        product_from_row(&row)
    }

    #[instrument(skip(self), fields(row_count = tracing::field::Empty), err)]
    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, StoreError> {
        // Only the price bounds go to SQL. The name clause is matched in Rust so
        // case folding does not depend on the database collation.
        let rows = sqlx::query(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE ($1::float8 IS NULL OR price >= $1)
                AND ($2::float8 IS NULL OR price <= $2)
            ORDER BY id ASC
            "#
        ))
        .bind(filter.price_min)
        .bind(filter.price_max)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_products", e))?;

        let mut products = Vec::with_capacity(rows.len());
        for row in &rows {
            let product = product_from_row(row)?;
            if filter.matches(&product) {
                products.push(product);
            }
        }
        Span::current().record("row_count", products.len());
        Ok(products)
    }

    #[instrument(skip(self), fields(category_id = %category_id), err)]
    async fn list_products_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, StoreError> {
        // LEFT JOIN: one row with NULL product columns means "category exists, no products";
        // zero rows means the category itself is missing.
        let rows = sqlx::query(
            r#"
            SELECT
                p.id,
                p.name,
                p.description,
                p.price,
                p.category_id,
                p.created_at,
                p.updated_at
            FROM categories c
            LEFT JOIN products p ON p.category_id = c.id
            WHERE c.id = $1
            ORDER BY p.id ASC
            "#,
        )
        .bind(category_id.as_i64())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_products_by_category", e))?;

        if rows.is_empty() {
            return Err(StoreError::NotFound(EntityKind::Category));
        }

        let mut products = Vec::with_capacity(rows.len());
        for row in &rows {
            let product_id: Option<i64> = row
                .try_get("id")
                .map_err(|e| map_sqlx_error("list_products_by_category", e))?;
            if product_id.is_some() {
                products.push(product_from_row(row)?);
            }
        }
        Ok(products)
    }
}

#[derive(Debug)]
struct CategoryRow {
    id: i64,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for CategoryRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(CategoryRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category::from_parts(
            CategoryId::from_i64(row.id),
            row.name,
            Timestamps::from_parts(row.created_at, row.updated_at),
        )
    }
}

#[derive(Debug)]
struct ProductRow {
    id: i64,
    name: String,
    description: String,
    price: f64,
    category_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for ProductRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(ProductRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            price: row.try_get("price")?,
            category_id: row.try_get("category_id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product::from_parts(
            ProductId::from_i64(row.id),
            row.name,
            row.description,
            row.price,
            CategoryId::from_i64(row.category_id),
            Timestamps::from_parts(row.created_at, row.updated_at),
        )
    }
}

fn category_from_row(row: &PgRow) -> Result<Category, StoreError> {
    CategoryRow::from_row(row)
        .map(Category::from)
        .map_err(|e| StoreError::Backend(format!("failed to decode category row: {e}")))
}

fn product_from_row(row: &PgRow) -> Result<Product, StoreError> {
    ProductRow::from_row(row)
        .map(Product::from)
        .map_err(|e| StoreError::Backend(format!("failed to decode product row: {e}")))
}

/// Map SQLx errors to StoreError.
pub(crate) fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                // foreign_key_violation, check_violation
                Some("23503") | Some("23514") => StoreError::ConstraintViolation(msg),
                _ => StoreError::Backend(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::Backend(format!("connection pool closed in {}", operation))
        }
        _ => StoreError::Backend(format!("sqlx error in {}: {}", operation, err)),
    }
}
