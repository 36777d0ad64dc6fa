use rust_decimal::Decimal;
use serde_json::json;

use super::*;

fn form() -> ProductForm {
    ProductForm {
        title: "Widget".to_string(),
        price: "9.99".to_string(),
        description: "d".to_string(),
        category_id: "1".to_string(),
        image_url: None,
    }
}

#[test]
fn valid_form_is_cleaned() {
    let cleaned = validate_form(&form(), &[1, 2]).unwrap();
    assert_eq!(cleaned.title, "Widget");
    assert_eq!(cleaned.price, Decimal::new(999, 2));
    assert_eq!(cleaned.category_id, 1);
    assert_eq!(cleaned.image_url, None);
}

#[test]
fn every_invalid_field_is_reported_at_once() {
    let input = ProductForm {
        title: "   ".to_string(),
        price: "abc".to_string(),
        description: String::new(),
        category_id: "one".to_string(),
        image_url: Some("not a url".to_string()),
    };

    let errors = validate_form(&input, &[1]).unwrap_err();

    let fields: Vec<&str> = errors.fields().map(|(name, _)| name).collect();
    assert_eq!(
        fields,
        vec!["categoryId", "description", "image_url", "price", "title"]
    );
}

#[test]
fn title_longer_than_limit_is_rejected() {
    let input = ProductForm {
        title: "x".repeat(TITLE_MAX_CHARS + 1),
        ..form()
    };
    let errors = validate_form(&input, &[1]).unwrap_err();
    assert!(errors.get("title")[0].contains("at most 100"));

    let at_limit = ProductForm {
        title: "é".repeat(TITLE_MAX_CHARS),
        ..form()
    };
    assert!(validate_form(&at_limit, &[1]).is_ok());
}

#[test]
fn price_must_be_positive() {
    for price in ["0", "-1.50"] {
        let input = ProductForm {
            price: price.to_string(),
            ..form()
        };
        let errors = validate_form(&input, &[1]).unwrap_err();
        assert_eq!(errors.get("price").len(), 1, "price {price}");
    }
}

#[test]
fn price_accepts_exponent_notation() {
    for (price, expected) in [("1e2", Decimal::from(100)), ("2.5E-1", Decimal::new(25, 2))] {
        let input = ProductForm {
            price: price.to_string(),
            ..form()
        };
        let cleaned = validate_form(&input, &[1]).unwrap();
        assert_eq!(cleaned.price, expected, "price {price}");
    }

    let negative = ProductForm {
        price: "-1e2".to_string(),
        ..form()
    };
    let errors = validate_form(&negative, &[1]).unwrap_err();
    assert!(errors.get("price")[0].contains("greater than zero"));
}

#[test]
fn category_must_be_in_remote_list() {
    let errors = validate_form(&form(), &[2, 3]).unwrap_err();
    assert!(errors.get("categoryId")[0].contains("does not exist"));
}

#[test]
fn image_url_requires_http_scheme() {
    let ftp = ProductForm {
        image_url: Some("ftp://files.test/a.png".to_string()),
        ..form()
    };
    assert!(!validate_form(&ftp, &[1]).unwrap_err().get("image_url").is_empty());

    let https = ProductForm {
        image_url: Some(" https://i.imgur.com/a.png ".to_string()),
        ..form()
    };
    assert_eq!(
        validate_form(&https, &[1]).unwrap().image_url.as_deref(),
        Some("https://i.imgur.com/a.png")
    );

    let blank = ProductForm {
        image_url: Some(String::new()),
        ..form()
    };
    assert_eq!(validate_form(&blank, &[1]).unwrap().image_url, None);
}

#[test]
fn from_remote_prefills_edit_fields() {
    let raw = json!({
        "id": 4,
        "title": "Handmade Fresh Table",
        "price": 687,
        "description": "Andy shoes are designed",
        "category": {"id": 5, "name": "Others"},
        "images": ["https://placeimg.com/640/480/any"]
    });

    let prefilled = ProductForm::from_remote(&raw);

    assert_eq!(prefilled.title, "Handmade Fresh Table");
    assert_eq!(prefilled.price, "687");
    assert_eq!(prefilled.category_id, "5");
    assert_eq!(prefilled.image_url, None);
    assert!(validate_form(&prefilled, &[5]).is_ok());
}

#[test]
fn from_remote_tolerates_missing_fields() {
    let prefilled = ProductForm::from_remote(&json!({"id": 4, "category": "Others"}));
    assert_eq!(prefilled, ProductForm::default());
}

#[test]
fn into_payload_converts_price_and_keeps_images() {
    let payload = validate_form(&form(), &[1])
        .unwrap()
        .into_payload(vec!["https://via.placeholder.com/150".to_string()]);
    assert!((payload.price - 9.99).abs() < 1e-9);
    assert_eq!(payload.category_id, 1);
    assert_eq!(payload.images, vec!["https://via.placeholder.com/150"]);
}
