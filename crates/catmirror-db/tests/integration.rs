//! Offline tests for catmirror-db pool configuration and row conversions.
//! These tests do not require a live database connection.

use catmirror_core::{AppConfig, Category, Environment, Product};
use catmirror_db::{CategoryRow, PoolConfig, ProductRow};
use chrono::Utc;
use rust_decimal::Decimal;

fn app_config() -> AppConfig {
    AppConfig {
        database_url: Some("postgres://example".to_string()),
        env: Environment::Test,
        log_level: "info".to_string(),
        api_base_url: "https://api.escuelajs.co/api/v1/".to_string(),
        placeholder_image_url: "https://via.placeholder.com/150".to_string(),
        api_timeout_secs: 30,
        api_user_agent: "ua".to_string(),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
    }
}

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let pool_config = PoolConfig::from_app_config(&app_config());
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[tokio::test]
async fn connect_pool_from_config_requires_database_url() {
    let mut config = app_config();
    config.database_url = None;
    let err = catmirror_db::connect_pool_from_config(&config)
        .await
        .unwrap_err();
    assert!(matches!(err, catmirror_db::DbError::MissingDatabaseUrl));
}

#[test]
fn category_row_converts_to_domain_category() {
    let row = CategoryRow {
        id: 3,
        name: "Furniture".to_string(),
        image: "https://i.imgur.com/Qphac99.jpeg".to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    let category = Category::from(row);
    assert_eq!(category.id, 3);
    assert_eq!(category.name, "Furniture");
    assert_eq!(category.image, "https://i.imgur.com/Qphac99.jpeg");
}

#[test]
fn product_row_converts_to_domain_product() {
    let row = ProductRow {
        id: 42,
        title: "Sleek Wireless Headphones".to_string(),
        price: Decimal::new(4600, 2),
        description: String::new(),
        category_id: 2,
        image: String::new(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    let product = Product::from(row);
    assert_eq!(product.id, 42);
    assert_eq!(product.category_id, 2);
    assert_eq!(product.price, Decimal::new(46, 0));
}
