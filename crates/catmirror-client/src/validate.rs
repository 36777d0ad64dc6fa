//! Shape checks for raw category and product payloads.
//!
//! The remote catalog returns records that are missing fields, carry a string
//! where a `category` object is expected, or list image "URLs" that are really
//! JSON-encoded strings. Each check returns `Result<Valid, Rejection>`; a
//! rejection is an expected outcome that callers count and report.

use std::str::FromStr;

use catmirror_core::Category;
use rust_decimal::Decimal;
use serde_json::{Map, Value};

/// Why a raw record was not accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// Best-effort identification of the record: title or name, else `id=N`,
    /// else `"<unidentified>"`.
    pub label: String,
    pub reason: String,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.label, self.reason)
    }
}

/// A product payload with the required shape. The category reference has not
/// been resolved against the local mirror yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidProduct {
    pub id: i64,
    pub title: String,
    pub price: Decimal,
    pub description: String,
    pub category_id: i64,
    /// Output of [`first_image_url`]; possibly empty.
    pub image: String,
}

/// Validates a raw category.
///
/// Requires an integer `id` and a non-empty string `name`. `image` defaults to
/// an empty string when absent or not a string.
///
/// # Errors
///
/// Returns a [`Rejection`] describing the first missing or mistyped field.
pub fn validate_category(raw: &Value) -> Result<Category, Rejection> {
    let obj = as_record(raw)?;
    let label = label_for(obj, "name");
    let reject = |reason: String| Rejection {
        label: label.clone(),
        reason,
    };

    let id = require_i64(obj, "id").map_err(reject)?;
    let name = require_str(obj, "name").map_err(reject)?;
    if name.trim().is_empty() {
        return Err(reject("field \"name\" is empty".to_string()));
    }
    let image = obj
        .get("image")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned();

    Ok(Category {
        id,
        name: name.to_owned(),
        image,
    })
}

/// Validates a raw product.
///
/// Requires an integer `id`, a string `title`, a numeric `price` (JSON number
/// or numeric string) and a `category` object carrying an integer `id`.
///
/// # Errors
///
/// Returns a [`Rejection`] describing the first missing or mistyped field.
pub fn validate_product(raw: &Value) -> Result<ValidProduct, Rejection> {
    let obj = as_record(raw)?;
    let label = label_for(obj, "title");
    let reject = |reason: String| Rejection {
        label: label.clone(),
        reason,
    };

    let id = require_i64(obj, "id").map_err(reject)?;
    let title = require_str(obj, "title").map_err(reject)?;
    let price = require_price(obj).map_err(reject)?;

    let category = match obj.get("category") {
        None | Some(Value::Null) => return Err(reject("missing field \"category\"".to_string())),
        Some(Value::Object(category)) => category,
        Some(_) => return Err(reject("category not an object".to_string())),
    };
    let category_id = match category.get("id") {
        Some(v) => v
            .as_i64()
            .ok_or_else(|| reject("category id is not an integer".to_string()))?,
        None => return Err(reject("category object has no \"id\"".to_string())),
    };

    let description = obj
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned();

    Ok(ValidProduct {
        id,
        title: title.to_owned(),
        price,
        description,
        category_id,
        image: first_image_url(obj.get("images")),
    })
}

/// Picks the stored image from a raw `images` value.
///
/// Only the first element is considered: it is used when it is a string that
/// starts with an `http://` or `https://` scheme, otherwise the result is
/// empty.
#[must_use]
pub fn first_image_url(images: Option<&Value>) -> String {
    images
        .and_then(Value::as_array)
        .and_then(|list| list.first())
        .and_then(Value::as_str)
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
        .unwrap_or_default()
        .to_owned()
}

fn as_record(raw: &Value) -> Result<&Map<String, Value>, Rejection> {
    raw.as_object().ok_or_else(|| Rejection {
        label: "<unidentified>".to_string(),
        reason: "record is not a JSON object".to_string(),
    })
}

fn label_for(obj: &Map<String, Value>, key: &str) -> String {
    if let Some(s) = obj.get(key).and_then(Value::as_str).filter(|s| !s.is_empty()) {
        return s.to_owned();
    }
    match obj.get("id") {
        Some(id) if !id.is_null() => format!("id={id}"),
        _ => "<unidentified>".to_string(),
    }
}

fn require_i64(obj: &Map<String, Value>, key: &str) -> Result<i64, String> {
    match obj.get(key) {
        None | Some(Value::Null) => Err(format!("missing field \"{key}\"")),
        Some(v) => v
            .as_i64()
            .ok_or_else(|| format!("field \"{key}\" is not an integer")),
    }
}

fn require_str<'a>(obj: &'a Map<String, Value>, key: &str) -> Result<&'a str, String> {
    match obj.get(key) {
        None | Some(Value::Null) => Err(format!("missing field \"{key}\"")),
        Some(v) => v
            .as_str()
            .ok_or_else(|| format!("field \"{key}\" is not a string")),
    }
}

fn require_price(obj: &Map<String, Value>) -> Result<Decimal, String> {
    let not_numeric = || "field \"price\" is not numeric".to_string();
    match obj.get("price") {
        None | Some(Value::Null) => Err("missing field \"price\"".to_string()),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                Ok(Decimal::from(i))
            } else {
                n.as_f64()
                    .and_then(|f| Decimal::try_from(f).ok())
                    .map(|d| d.normalize())
                    .ok_or_else(not_numeric)
            }
        }
        Some(Value::String(s)) => Decimal::from_str(s.trim()).map_err(|_| not_numeric()),
        Some(_) => Err(not_numeric()),
    }
}

#[cfg(test)]
#[path = "validate_test.rs"]
mod tests;
