//! Create/edit product input and its field validation.

use std::str::FromStr;

use catmirror_client::ProductPayload;
use reqwest::Url;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::errors::FieldErrors;

pub const FIELD_TITLE: &str = "title";
pub const FIELD_PRICE: &str = "price";
pub const FIELD_DESCRIPTION: &str = "description";
pub const FIELD_CATEGORY_ID: &str = "categoryId";
pub const FIELD_IMAGE_URL: &str = "image_url";
pub const FIELD_IMAGE: &str = "image";

pub const TITLE_MAX_CHARS: usize = 100;

const REQUIRED: &str = "This field is required.";

/// Raw user input, kept as strings until [`validate_form`] runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub title: String,
    pub price: String,
    pub description: String,
    pub category_id: String,
    pub image_url: Option<String>,
}

impl ProductForm {
    /// Pre-fills an edit form from a remote product record.
    ///
    /// Missing or oddly-typed fields become empty strings; validation reports
    /// them if the user does not supply a replacement.
    #[must_use]
    pub fn from_remote(raw: &Value) -> Self {
        let text = |key: &str| raw.get(key).and_then(Value::as_str).unwrap_or("").to_owned();
        let price = match raw.get("price") {
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::String(s)) => s.clone(),
            _ => String::new(),
        };
        let category_id = raw
            .get("category")
            .and_then(|c| c.get("id"))
            .and_then(Value::as_i64)
            .map(|id| id.to_string())
            .unwrap_or_default();

        Self {
            title: text("title"),
            price,
            description: text("description"),
            category_id,
            image_url: None,
        }
    }
}

/// A form that passed [`validate_form`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedForm {
    pub title: String,
    pub price: Decimal,
    pub description: String,
    pub category_id: i64,
    pub image_url: Option<String>,
}

impl CleanedForm {
    /// Builds the remote payload with the resolved image list.
    #[must_use]
    pub fn into_payload(self, images: Vec<String>) -> ProductPayload {
        ProductPayload {
            title: self.title,
            // Range was checked in validate_form.
            price: self.price.to_f64().unwrap_or_default(),
            description: self.description,
            category_id: self.category_id,
            images,
        }
    }
}

/// Validates every field and returns all failures together.
///
/// `known_category_ids` is the remote category list loaded for this request.
///
/// # Errors
///
/// Returns the [`FieldErrors`] collected across all fields when any fails.
pub fn validate_form(
    form: &ProductForm,
    known_category_ids: &[i64],
) -> Result<CleanedForm, FieldErrors> {
    let mut errors = FieldErrors::new();

    let title = form.title.trim();
    let title_chars = title.chars().count();
    if title.is_empty() {
        errors.add(FIELD_TITLE, REQUIRED);
    } else if title_chars > TITLE_MAX_CHARS {
        errors.add(
            FIELD_TITLE,
            format!("Use at most {TITLE_MAX_CHARS} characters (it has {title_chars})."),
        );
    }

    let price = parse_price(form.price.trim()).map_err(|msg| errors.add(FIELD_PRICE, msg));

    let description = form.description.trim();
    if description.is_empty() {
        errors.add(FIELD_DESCRIPTION, REQUIRED);
    }

    let category_id = parse_category_id(form.category_id.trim(), known_category_ids)
        .map_err(|msg| errors.add(FIELD_CATEGORY_ID, msg));

    let image_url = match form.image_url.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(url) if is_http_url(url) => Ok(Some(url.to_owned())),
        Some(_) => {
            errors.add(FIELD_IMAGE_URL, "Enter a valid http(s) URL.");
            Err(())
        }
    };

    match (price, category_id, image_url) {
        (Ok(price), Ok(category_id), Ok(image_url)) if errors.is_empty() => Ok(CleanedForm {
            title: title.to_owned(),
            price,
            description: description.to_owned(),
            category_id,
            image_url,
        }),
        _ => Err(errors),
    }
}

fn parse_price(raw: &str) -> Result<Decimal, String> {
    if raw.is_empty() {
        return Err(REQUIRED.to_string());
    }
    let price = Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| "Enter a number.".to_string())?;
    if price <= Decimal::ZERO {
        return Err("Price must be greater than zero.".to_string());
    }
    if price.to_f64().is_none() {
        return Err("Price is out of range.".to_string());
    }
    Ok(price)
}

fn parse_category_id(raw: &str, known: &[i64]) -> Result<i64, String> {
    if raw.is_empty() {
        return Err(REQUIRED.to_string());
    }
    let id = raw
        .parse::<i64>()
        .map_err(|_| "Enter a whole number.".to_string())?;
    if !known.contains(&id) {
        return Err(format!("Category {id} does not exist."));
    }
    Ok(id)
}

fn is_http_url(raw: &str) -> bool {
    Url::parse(raw)
        .is_ok_and(|url| matches!(url.scheme(), "http" | "https") && url.host().is_some())
}

#[cfg(test)]
#[path = "form_test.rs"]
mod tests;
