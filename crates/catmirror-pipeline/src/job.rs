use catmirror_client::{validate_category, validate_product, CatalogClient, ProductFilter};
use catmirror_db::CatalogStore;

use crate::reconcile::{CategoryReconciler, ProductReconciler};
use crate::report::{count, RecordKind, SkippedRecord, SyncFailure, SyncReport, SyncStep};

/// One pull of the remote catalog into the local mirror.
///
/// Categories are fully reconciled before any product is fetched, so a
/// product referencing a category created in the same cycle resolves.
pub struct CatalogSyncJob<'a, S> {
    client: &'a CatalogClient,
    store: &'a S,
}

impl<'a, S: CatalogStore> CatalogSyncJob<'a, S> {
    pub fn new(client: &'a CatalogClient, store: &'a S) -> Self {
        Self { client, store }
    }

    /// Runs categories then products and returns the report.
    ///
    /// A failed category fetch aborts before the product fetch is attempted.
    /// A failed product fetch keeps the categories already committed.
    pub async fn run(&self) -> SyncReport {
        let mut report = SyncReport::default();
        tracing::info!("catalog sync started");

        let raw_categories = match self.client.list_categories().await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(error = %e, "category fetch failed; aborting sync");
                report.failure = Some(SyncFailure {
                    step: SyncStep::Categories,
                    message: format!("failed to fetch categories: {e}"),
                });
                return report;
            }
        };

        let mut categories = Vec::with_capacity(raw_categories.len());
        for raw in &raw_categories {
            match validate_category(raw) {
                Ok(category) => categories.push(category),
                Err(rejection) => {
                    tracing::warn!(%rejection, "skipping malformed category");
                    report.counts.categories_skipped += 1;
                    report
                        .skipped
                        .push(SkippedRecord::malformed(RecordKind::Category, rejection));
                }
            }
        }

        let outcome = CategoryReconciler::new(self.store)
            .reconcile(&categories)
            .await;
        report.counts.categories_created = outcome.created;
        report.counts.categories_updated = outcome.updated;
        report.counts.write_failures += count(outcome.failures.len());
        report.skipped.extend(outcome.failures);

        let raw_products = match self.client.list_products(&ProductFilter::default()).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(error = %e, "product fetch failed; categories kept");
                report.failure = Some(SyncFailure {
                    step: SyncStep::Products,
                    message: format!("failed to fetch products: {e}"),
                });
                return report;
            }
        };

        let mut products = Vec::with_capacity(raw_products.len());
        for raw in &raw_products {
            match validate_product(raw) {
                Ok(product) => products.push(product),
                Err(rejection) => {
                    tracing::warn!(%rejection, "skipping malformed product");
                    report.counts.products_skipped += 1;
                    report
                        .skipped
                        .push(SkippedRecord::malformed(RecordKind::Product, rejection));
                }
            }
        }

        let outcome = ProductReconciler::new(self.store).reconcile(&products).await;
        report.counts.products_created = outcome.created;
        report.counts.products_updated = outcome.updated;
        report.counts.products_skipped += count(outcome.skipped.len());
        report.counts.write_failures += count(outcome.failures.len());
        report.skipped.extend(outcome.skipped);
        report.skipped.extend(outcome.failures);

        tracing::info!(
            categories_created = report.counts.categories_created,
            categories_updated = report.counts.categories_updated,
            categories_skipped = report.counts.categories_skipped,
            products_created = report.counts.products_created,
            products_updated = report.counts.products_updated,
            products_skipped = report.counts.products_skipped,
            write_failures = report.counts.write_failures,
            "catalog sync finished"
        );
        report
    }
}
