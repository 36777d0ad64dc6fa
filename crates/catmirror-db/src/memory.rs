//! In-process [`CatalogStore`], used for dry runs and tests.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use catmirror_core::{Category, Product, UpsertOutcome};

use crate::store::CatalogStore;
use crate::DbError;

#[derive(Debug, Default)]
struct Tables {
    categories: BTreeMap<i64, Category>,
    products: BTreeMap<i64, Product>,
}

/// A [`CatalogStore`] holding the mirror in two ordered maps.
///
/// Applies the same foreign-key rule as the Postgres schema: a product can
/// only be written when its category is present.
#[derive(Debug, Default)]
pub struct MemoryCatalogStore {
    tables: Mutex<Tables>,
}

impl MemoryCatalogStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All stored categories, ordered by id.
    #[must_use]
    pub fn categories(&self) -> Vec<Category> {
        self.lock().categories.values().cloned().collect()
    }

    /// All stored products, ordered by id.
    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.lock().products.values().cloned().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        // The maps are never left half-written, so a poisoned lock is still usable.
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn outcome(previous: Option<impl Sized>) -> UpsertOutcome {
    if previous.is_some() {
        UpsertOutcome::Updated
    } else {
        UpsertOutcome::Created
    }
}

impl CatalogStore for MemoryCatalogStore {
    async fn upsert_category(&self, category: &Category) -> Result<UpsertOutcome, DbError> {
        let previous = self
            .lock()
            .categories
            .insert(category.id, category.clone());
        Ok(outcome(previous))
    }

    async fn upsert_product(&self, product: &Product) -> Result<UpsertOutcome, DbError> {
        let mut tables = self.lock();
        if !tables.categories.contains_key(&product.category_id) {
            return Err(DbError::MissingCategory {
                category_id: product.category_id,
            });
        }
        let previous = tables.products.insert(product.id, product.clone());
        Ok(outcome(previous))
    }

    async fn get_category_by_id(&self, id: i64) -> Result<Option<Category>, DbError> {
        Ok(self.lock().categories.get(&id).cloned())
    }

    async fn get_product_by_id(&self, id: i64) -> Result<Option<Product>, DbError> {
        Ok(self.lock().products.get(&id).cloned())
    }

    async fn delete_product(&self, id: i64) -> Result<bool, DbError> {
        Ok(self.lock().products.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn category(id: i64, name: &str) -> Category {
        Category {
            id,
            name: name.to_string(),
            image: String::new(),
        }
    }

    fn product(id: i64, category_id: i64) -> Product {
        Product {
            id,
            title: format!("Product {id}"),
            price: Decimal::new(1999, 2),
            description: String::new(),
            category_id,
            image: String::new(),
        }
    }

    #[tokio::test]
    async fn upsert_category_reports_created_then_updated() {
        let store = MemoryCatalogStore::new();
        assert_eq!(
            store.upsert_category(&category(1, "Clothes")).await.unwrap(),
            UpsertOutcome::Created
        );
        assert_eq!(
            store.upsert_category(&category(1, "Apparel")).await.unwrap(),
            UpsertOutcome::Updated
        );
        let stored = store.get_category_by_id(1).await.unwrap().unwrap();
        assert_eq!(stored.name, "Apparel");
        assert_eq!(store.categories().len(), 1);
    }

    #[tokio::test]
    async fn upsert_product_requires_known_category() {
        let store = MemoryCatalogStore::new();
        let err = store.upsert_product(&product(10, 3)).await.unwrap_err();
        assert!(matches!(err, DbError::MissingCategory { category_id: 3 }));
        assert!(store.products().is_empty());
    }

    #[tokio::test]
    async fn delete_product_reports_whether_a_row_was_removed() {
        let store = MemoryCatalogStore::new();
        store.upsert_category(&category(1, "Clothes")).await.unwrap();
        store.upsert_product(&product(10, 1)).await.unwrap();

        assert!(store.delete_product(10).await.unwrap());
        assert!(!store.delete_product(10).await.unwrap());
        assert!(store.get_product_by_id(10).await.unwrap().is_none());
    }
}
