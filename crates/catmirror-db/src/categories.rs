//! Database operations for `categories`.

use catmirror_core::{Category, UpsertOutcome};
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `categories` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CategoryRow {
    pub id: i64,
    pub name: String,
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            name: row.name,
            image: row.image,
        }
    }
}

/// Upserts a category by its remote id.
///
/// Conflicts on `id` overwrite `name`, `image`, and `updated_at` in place.
/// `xmax = 0` in `RETURNING` is true only for freshly inserted tuples, which
/// is how created and updated rows are told apart in one round-trip.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_category(pool: &PgPool, category: &Category) -> Result<UpsertOutcome, DbError> {
    let inserted: bool = sqlx::query_scalar::<_, bool>(
        "INSERT INTO categories (id, name, image) \
         VALUES ($1, $2, $3) \
         ON CONFLICT (id) DO UPDATE SET \
             name       = EXCLUDED.name, \
             image      = EXCLUDED.image, \
             updated_at = NOW() \
         RETURNING (xmax = 0) AS inserted",
    )
    .bind(category.id)
    .bind(&category.name)
    .bind(&category.image)
    .fetch_one(pool)
    .await?;

    Ok(if inserted {
        UpsertOutcome::Created
    } else {
        UpsertOutcome::Updated
    })
}

/// Returns the category with the given remote id, if mirrored.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_category_by_id(pool: &PgPool, id: i64) -> Result<Option<CategoryRow>, DbError> {
    let row = sqlx::query_as::<_, CategoryRow>(
        "SELECT id, name, image, created_at, updated_at \
         FROM categories \
         WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
