//! Request and response types for the remote catalog API.
//!
//! Catalog records themselves are returned as raw `serde_json::Value`s: the
//! remote API is known to return missing fields, string-typed categories and
//! image lists holding non-URL strings, so shape checks live in
//! [`crate::validate`] instead of in `Deserialize` impls.

use serde::{Deserialize, Serialize};

/// Optional search filters for `GET products`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Matched by the remote API against product titles.
    pub title: Option<String>,
    pub category_id: Option<i64>,
}

impl ProductFilter {
    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(title) = self.title.as_deref().filter(|t| !t.is_empty()) {
            pairs.push(("title", title.to_owned()));
        }
        if let Some(category_id) = self.category_id {
            pairs.push(("categoryId", category_id.to_string()));
        }
        pairs
    }
}

/// Body for `POST products/` and `PUT products/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductPayload {
    pub title: String,
    pub price: f64,
    pub description: String,
    #[serde(rename = "categoryId")]
    pub category_id: i64,
    pub images: Vec<String>,
}

/// A file to send to `POST files/upload`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_name: String,
    /// MIME type, e.g. `"image/png"`. Sent as the part's `Content-Type` when set.
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Response from `POST files/upload`.
///
/// Observed shape: `{"originalname": "a.png", "filename": "2f3e.png",
/// "location": "https://api.escuelajs.co/api/v1/files/2f3e.png"}`. Only
/// `location` is used.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadResponse {
    pub location: String,
}
