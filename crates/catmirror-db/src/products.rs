//! Database operations for `products`.

use catmirror_core::{Product, UpsertOutcome};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::DbError;

/// A row from the `products` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub title: String,
    /// `NUMERIC(12,2)`; prices with more decimal places are rounded on write.
    pub price: Decimal,
    pub description: String,
    pub category_id: i64,
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            title: row.title,
            price: row.price,
            description: row.description,
            category_id: row.category_id,
            image: row.image,
        }
    }
}

/// Upserts a product by its remote id.
///
/// Conflicts on `id` overwrite every mirrored column and `updated_at`.
///
/// # Errors
///
/// Returns [`DbError::MissingCategory`] if `category_id` has no row in
/// `categories` (foreign-key violation), or [`DbError::Sqlx`] otherwise.
pub async fn upsert_product(pool: &PgPool, product: &Product) -> Result<UpsertOutcome, DbError> {
    let inserted: bool = sqlx::query_scalar::<_, bool>(
        "INSERT INTO products (id, title, price, description, category_id, image) \
         VALUES ($1, $2, $3::numeric(12,2), $4, $5, $6) \
         ON CONFLICT (id) DO UPDATE SET \
             title       = EXCLUDED.title, \
             price       = EXCLUDED.price, \
             description = EXCLUDED.description, \
             category_id = EXCLUDED.category_id, \
             image       = EXCLUDED.image, \
             updated_at  = NOW() \
         RETURNING (xmax = 0) AS inserted",
    )
    .bind(product.id)
    .bind(&product.title)
    .bind(product.price)
    .bind(&product.description)
    .bind(product.category_id)
    .bind(&product.image)
    .fetch_one(pool)
    .await
    .map_err(|e| DbError::from_product_write(e, product.category_id))?;

    Ok(if inserted {
        UpsertOutcome::Created
    } else {
        UpsertOutcome::Updated
    })
}

/// Returns the product with the given remote id, if mirrored.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_product_by_id(pool: &PgPool, id: i64) -> Result<Option<ProductRow>, DbError> {
    let row = sqlx::query_as::<_, ProductRow>(
        "SELECT id, title, price, description, category_id, image, created_at, updated_at \
         FROM products \
         WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Deletes a mirrored product. Returns `true` if a row was removed.
///
/// This is an operator action; sync never deletes.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn delete_product(pool: &PgPool, id: i64) -> Result<bool, DbError> {
    let rows_affected = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();

    Ok(rows_affected > 0)
}
