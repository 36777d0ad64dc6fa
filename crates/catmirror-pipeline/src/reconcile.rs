//! Upserts validated remote records into the local mirror.
//!
//! Each record is written independently: a failed write is logged, recorded
//! and the loop moves on to the next record.

use std::collections::HashMap;

use catmirror_client::ValidProduct;
use catmirror_core::{Category, Product, UpsertOutcome};
use catmirror_db::{CatalogStore, DbError};

use crate::report::{RecordKind, SkipReason, SkippedRecord};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryOutcome {
    pub created: u32,
    pub updated: u32,
    /// Categories whose upsert failed.
    pub failures: Vec<SkippedRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductOutcome {
    pub created: u32,
    pub updated: u32,
    /// Products not written because their category is absent locally.
    pub skipped: Vec<SkippedRecord>,
    /// Products whose category lookup or upsert failed.
    pub failures: Vec<SkippedRecord>,
}

pub struct CategoryReconciler<'a, S> {
    store: &'a S,
}

impl<'a, S: CatalogStore> CategoryReconciler<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Upserts every category, keyed by remote id.
    pub async fn reconcile(&self, categories: &[Category]) -> CategoryOutcome {
        let mut outcome = CategoryOutcome::default();

        for category in categories {
            match self.store.upsert_category(category).await {
                Ok(UpsertOutcome::Created) => {
                    outcome.created += 1;
                    tracing::debug!(id = category.id, name = %category.name, "category created");
                }
                Ok(UpsertOutcome::Updated) => {
                    outcome.updated += 1;
                    tracing::debug!(id = category.id, name = %category.name, "category updated");
                }
                Err(e) => {
                    tracing::warn!(
                        id = category.id,
                        name = %category.name,
                        error = %e,
                        "category upsert failed; continuing"
                    );
                    outcome.failures.push(SkippedRecord::write_failed(
                        RecordKind::Category,
                        category.name.clone(),
                        e.to_string(),
                    ));
                }
            }
        }

        outcome
    }
}

pub struct ProductReconciler<'a, S> {
    store: &'a S,
}

impl<'a, S: CatalogStore> ProductReconciler<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Upserts every product whose category exists in the mirror.
    ///
    /// Category existence is looked up once per distinct id per call, so a
    /// category written earlier in the same cycle is visible here.
    pub async fn reconcile(&self, products: &[ValidProduct]) -> ProductOutcome {
        let mut outcome = ProductOutcome::default();
        let mut known: HashMap<i64, bool> = HashMap::new();

        for product in products {
            let exists = match self.category_exists(&mut known, product.category_id).await {
                Ok(exists) => exists,
                Err(e) => {
                    tracing::warn!(
                        title = %product.title,
                        category_id = product.category_id,
                        error = %e,
                        "category lookup failed; skipping product"
                    );
                    outcome.failures.push(SkippedRecord::write_failed(
                        RecordKind::Product,
                        product.title.clone(),
                        e.to_string(),
                    ));
                    continue;
                }
            };

            if !exists {
                tracing::warn!(
                    title = %product.title,
                    category_id = product.category_id,
                    "category does not exist locally; skipping product"
                );
                outcome.skipped.push(SkippedRecord {
                    kind: RecordKind::Product,
                    label: product.title.clone(),
                    reason: SkipReason::UnresolvedCategory {
                        category_id: product.category_id,
                    },
                });
                continue;
            }

            match self.store.upsert_product(&to_product(product)).await {
                Ok(UpsertOutcome::Created) => {
                    outcome.created += 1;
                    tracing::debug!(id = product.id, title = %product.title, "product created");
                }
                Ok(UpsertOutcome::Updated) => {
                    outcome.updated += 1;
                    tracing::debug!(id = product.id, title = %product.title, "product updated");
                }
                Err(e) => {
                    tracing::warn!(
                        id = product.id,
                        title = %product.title,
                        error = %e,
                        "product upsert failed; continuing"
                    );
                    outcome.failures.push(SkippedRecord::write_failed(
                        RecordKind::Product,
                        product.title.clone(),
                        e.to_string(),
                    ));
                }
            }
        }

        outcome
    }

    async fn category_exists(
        &self,
        known: &mut HashMap<i64, bool>,
        category_id: i64,
    ) -> Result<bool, DbError> {
        if let Some(&exists) = known.get(&category_id) {
            return Ok(exists);
        }
        let exists = self.store.get_category_by_id(category_id).await?.is_some();
        known.insert(category_id, exists);
        Ok(exists)
    }
}

fn to_product(valid: &ValidProduct) -> Product {
    Product {
        id: valid.id,
        title: valid.title.clone(),
        price: valid.price,
        description: valid.description.clone(),
        category_id: valid.category_id,
        image: valid.image.clone(),
    }
}

#[cfg(test)]
#[path = "reconcile_test.rs"]
mod tests;
