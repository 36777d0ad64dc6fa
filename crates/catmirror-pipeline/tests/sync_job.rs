//! End-to-end sync cycles against a `wiremock` catalog and an in-memory store.

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use catmirror_client::CatalogClient;
use catmirror_db::MemoryCatalogStore;
use catmirror_pipeline::{CatalogSyncJob, RecordKind, SkipReason, SyncStep};

fn test_client(server: &MockServer) -> CatalogClient {
    CatalogClient::new(&format!("{}/api/v1", server.uri()), 5, "catmirror-test/0.1")
        .expect("failed to build test CatalogClient")
}

async fn mount_categories(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/v1/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_products(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/v1/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn mirrors_categories_then_products() {
    let server = MockServer::start().await;
    mount_categories(
        &server,
        json!([
            {"id": 1, "name": "Clothes", "image": "https://i.imgur.com/QkIa5tT.jpeg"},
            {"id": 2, "name": "Electronics"}
        ]),
    )
    .await;
    mount_products(
        &server,
        json!([
            {
                "id": 10, "title": "Classic Tee", "price": 44, "description": "Soft",
                "category": {"id": 1, "name": "Clothes"},
                "images": ["https://i.imgur.com/tee.jpeg", "https://i.imgur.com/tee2.jpeg"]
            },
            {
                "id": 11, "title": "Headphones", "price": "19.99",
                "category": {"id": 2}, "images": ["[\"https://i.imgur.com/x.jpeg\"]"]
            }
        ]),
    )
    .await;

    let client = test_client(&server);
    let store = MemoryCatalogStore::new();
    let report = CatalogSyncJob::new(&client, &store).run().await;

    assert!(report.is_success(), "unexpected failure: {:?}", report.failure);
    assert_eq!(report.counts.categories_created, 2);
    assert_eq!(report.counts.products_created, 2);
    assert!(report.skipped.is_empty());

    let products = store.products();
    assert_eq!(products[0].image, "https://i.imgur.com/tee.jpeg");
    // The second record's first image is not a URL.
    assert_eq!(products[1].image, "");
    assert_eq!(products[1].description, "");
}

#[tokio::test]
async fn second_run_updates_instead_of_creating() {
    let server = MockServer::start().await;
    mount_categories(&server, json!([{"id": 1, "name": "Clothes"}])).await;
    mount_products(
        &server,
        json!([{"id": 10, "title": "Tee", "price": 5, "category": {"id": 1}}]),
    )
    .await;

    let client = test_client(&server);
    let store = MemoryCatalogStore::new();
    let job = CatalogSyncJob::new(&client, &store);
    job.run().await;
    let second = job.run().await;

    assert_eq!(second.counts.categories_created, 0);
    assert_eq!(second.counts.categories_updated, 1);
    assert_eq!(second.counts.products_updated, 1);
    assert_eq!(store.categories().len(), 1);
    assert_eq!(store.products().len(), 1);
}

#[tokio::test]
async fn category_fetch_failure_aborts_before_products() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/categories"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let store = MemoryCatalogStore::new();
    let report = CatalogSyncJob::new(&client, &store).run().await;

    let failure = report.failure.expect("sync should report a failure");
    assert_eq!(failure.step, SyncStep::Categories);
    assert!(failure.message.contains("upstream down"));
    assert_eq!(report.counts.categories_created, 0);
    assert_eq!(report.counts.categories_updated, 0);
    assert!(store.categories().is_empty());
}

#[tokio::test]
async fn product_fetch_failure_keeps_committed_categories() {
    let server = MockServer::start().await;
    mount_categories(&server, json!([{"id": 1, "name": "Clothes"}])).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/products"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let store = MemoryCatalogStore::new();
    let report = CatalogSyncJob::new(&client, &store).run().await;

    assert_eq!(report.failure.map(|f| f.step), Some(SyncStep::Products));
    assert_eq!(report.counts.categories_created, 1);
    assert_eq!(store.categories().len(), 1);
}

#[tokio::test]
async fn malformed_and_unresolved_records_are_listed_and_counted() {
    let server = MockServer::start().await;
    mount_categories(
        &server,
        json!([{"id": 1, "name": "Clothes"}, {"id": "two", "name": "Bad"}]),
    )
    .await;
    mount_products(
        &server,
        json!([
            {"id": 10, "title": "Good", "price": 5, "category": {"id": 1}},
            {"id": 11, "title": "Stringly", "price": 5, "category": "Clothes"},
            {"id": 12, "title": "Orphan", "price": 5, "category": {"id": 99}},
            {"id": 13, "title": "No price", "category": {"id": 1}}
        ]),
    )
    .await;

    let client = test_client(&server);
    let store = MemoryCatalogStore::new();
    let report = CatalogSyncJob::new(&client, &store).run().await;

    assert!(report.is_success());
    assert_eq!(report.counts.categories_created, 1);
    assert_eq!(report.counts.categories_skipped, 1);
    assert_eq!(report.counts.products_created, 1);
    assert_eq!(report.counts.products_skipped, 3);
    assert_eq!(report.counts.write_failures, 0);

    let stringly = report
        .skipped
        .iter()
        .find(|s| s.label == "Stringly")
        .expect("string category should be listed");
    assert_eq!(stringly.kind, RecordKind::Product);
    assert!(stringly.reason.to_string().contains("category"));

    let orphan = report
        .skipped
        .iter()
        .find(|s| s.label == "Orphan")
        .expect("unresolved category should be listed");
    assert_eq!(
        orphan.reason,
        SkipReason::UnresolvedCategory { category_id: 99 }
    );

    let no_price = report
        .skipped
        .iter()
        .find(|s| s.label == "No price")
        .expect("missing price should be listed");
    assert!(no_price.reason.to_string().contains("price"));

    let ids: Vec<i64> = store.products().iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![10]);
}
