//! Live integration tests for catmirror-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database from the sqlx
//! test harness, so they need `DATABASE_URL` pointing at a server where the
//! test user may create databases. Run with:
//! `cargo test -p catmirror-db --test live -- --ignored`

use catmirror_core::{Category, Product, SyncCounts, UpsertOutcome};
use catmirror_db::{
    complete_sync_run, fail_sync_run, get_sync_run, list_sync_runs, start_sync_run, CatalogStore,
    DbError, PgCatalogStore,
};
use rust_decimal::Decimal;

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
        description: "desc".to_string(),
        category_id,
        image: "https://i.imgur.com/x.jpeg".to_string(),
    }
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn upsert_category_distinguishes_created_from_updated(pool: sqlx::PgPool) {
    let store = PgCatalogStore::new(pool);

    let first = store.upsert_category(&category(1, "Clothes")).await.unwrap();
    let second = store.upsert_category(&category(1, "Apparel")).await.unwrap();

    assert_eq!(first, UpsertOutcome::Created);
    assert_eq!(second, UpsertOutcome::Updated);
    let stored = store.get_category_by_id(1).await.unwrap().unwrap();
    assert_eq!(stored.name, "Apparel");
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn upsert_product_without_category_maps_fk_violation(pool: sqlx::PgPool) {
    let store = PgCatalogStore::new(pool);

    let err = store.upsert_product(&product(10, 99)).await.unwrap_err();

    assert!(
        matches!(err, DbError::MissingCategory { category_id: 99 }),
        "expected MissingCategory, got: {err:?}"
    );
    assert!(store.get_product_by_id(10).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn upsert_then_delete_product(pool: sqlx::PgPool) {
    let store = PgCatalogStore::new(pool);
    store.upsert_category(&category(1, "Clothes")).await.unwrap();

    assert_eq!(
        store.upsert_product(&product(10, 1)).await.unwrap(),
        UpsertOutcome::Created
    );
    let stored = store.get_product_by_id(10).await.unwrap().unwrap();
    assert_eq!(stored.price, Decimal::new(1999, 2));

    assert!(store.delete_product(10).await.unwrap());
    assert!(!store.delete_product(10).await.unwrap());
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn sync_run_lifecycle_records_counts(pool: sqlx::PgPool) {
    let run = start_sync_run(&pool, "test").await.unwrap();
    assert_eq!(run.status, "running");

    let counts = SyncCounts {
        categories_created: 2,
        products_skipped: 3,
        ..SyncCounts::default()
    };
    complete_sync_run(&pool, run.id, &counts).await.unwrap();

    let stored = get_sync_run(&pool, run.id).await.unwrap().unwrap();
    assert_eq!(stored.status, "succeeded");
    assert_eq!(stored.categories_created, 2);
    assert_eq!(stored.products_skipped, 3);
    assert!(stored.completed_at.is_some());

    let err = fail_sync_run(&pool, run.id, &counts, "late failure")
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::InvalidSyncRunTransition { .. }));

    let runs = list_sync_runs(&pool, 10).await.unwrap();
    assert_eq!(runs.len(), 1);
}
