//! The local-mirror seam used by the reconcilers.

use std::future::Future;

use catmirror_core::{Category, Product, UpsertOutcome};
use sqlx::PgPool;

use crate::DbError;

/// Storage for the local catalog mirror.
///
/// Every write is a single-row upsert keyed by the remote id, which is the
/// only concurrency guarantee callers rely on.
pub trait CatalogStore {
    fn upsert_category(
        &self,
        category: &Category,
    ) -> impl Future<Output = Result<UpsertOutcome, DbError>> + Send;

    /// Implementations must refuse products whose `category_id` is not
    /// stored, with [`DbError::MissingCategory`].
    fn upsert_product(
        &self,
        product: &Product,
    ) -> impl Future<Output = Result<UpsertOutcome, DbError>> + Send;

    fn get_category_by_id(
        &self,
        id: i64,
    ) -> impl Future<Output = Result<Option<Category>, DbError>> + Send;

    fn get_product_by_id(
        &self,
        id: i64,
    ) -> impl Future<Output = Result<Option<Product>, DbError>> + Send;

    /// Returns `true` if a product was removed.
    fn delete_product(&self, id: i64) -> impl Future<Output = Result<bool, DbError>> + Send;
}

/// [`CatalogStore`] backed by the Postgres `categories` and `products` tables.
#[derive(Debug, Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl CatalogStore for PgCatalogStore {
    async fn upsert_category(&self, category: &Category) -> Result<UpsertOutcome, DbError> {
        crate::categories::upsert_category(&self.pool, category).await
    }

    async fn upsert_product(&self, product: &Product) -> Result<UpsertOutcome, DbError> {
        crate::products::upsert_product(&self.pool, product).await
    }

    async fn get_category_by_id(&self, id: i64) -> Result<Option<Category>, DbError> {
        Ok(crate::categories::get_category_by_id(&self.pool, id)
            .await?
            .map(Category::from))
    }

    async fn get_product_by_id(&self, id: i64) -> Result<Option<Product>, DbError> {
        Ok(crate::products::get_product_by_id(&self.pool, id)
            .await?
            .map(Product::from))
    }

    async fn delete_product(&self, id: i64) -> Result<bool, DbError> {
        crate::products::delete_product(&self.pool, id).await
    }
}
