use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A category as held in the local mirror. `id` is assigned by the remote
/// catalog and is the local primary key too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    /// Image URL; empty when the remote record had none.
    pub image: String,
}

/// A product as held in the local mirror.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub title: String,
    /// Not required to be positive here; the remote source is authoritative.
    pub price: Decimal,
    pub description: String,
    /// Id of a category that exists in the same store.
    pub category_id: i64,
    /// Single image URL; empty when no usable image was supplied.
    pub image: String,
}

/// Whether an upsert inserted a new row or overwrote an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// Counters for one sync cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncCounts {
    pub categories_created: u32,
    pub categories_updated: u32,
    /// Category payloads rejected by validation.
    pub categories_skipped: u32,
    pub products_created: u32,
    pub products_updated: u32,
    /// Product payloads rejected by validation or whose category was unknown.
    pub products_skipped: u32,
    /// Store writes or lookups that failed for an individual record.
    pub write_failures: u32,
}

impl SyncCounts {
    /// Total records written (created or updated) during the cycle.
    #[must_use]
    pub fn records_written(&self) -> u32 {
        self.categories_created
            .saturating_add(self.categories_updated)
            .saturating_add(self.products_created)
            .saturating_add(self.products_updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_written_sums_created_and_updated() {
        let counts = SyncCounts {
            categories_created: 2,
            categories_updated: 3,
            categories_skipped: 9,
            products_created: 4,
            products_updated: 5,
            products_skipped: 7,
            write_failures: 1,
        };
        assert_eq!(counts.records_written(), 14);
    }

    #[test]
    fn records_written_zero_by_default() {
        assert_eq!(SyncCounts::default().records_written(), 0);
    }

    #[test]
    fn product_serializes_price_as_string() {
        let product = Product {
            id: 7,
            title: "Widget".to_string(),
            price: Decimal::new(999, 2),
            description: String::new(),
            category_id: 1,
            image: String::new(),
        };
        let json = serde_json::to_value(&product).expect("serialization failed");
        assert_eq!(json["price"], "9.99");
        assert_eq!(json["category_id"], 1);
    }
}
