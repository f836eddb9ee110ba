//! Request validation helpers.
//!
//! Field rules live as `validator` derive attributes on the request structs
//! (see `models`); this module holds the custom rule functions those
//! attributes reference and the conversion from `ValidationErrors` into the
//! field-addressable list carried by [`AppError::Validation`].

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

use crate::error::{AppError, AppResult, FieldError};

/// 10 or 13 digits, or 13-17 characters including hyphens
static ISBN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\d{10}|\d{13}|[\d-]{13,17})$").expect("valid isbn regex"));

/// Exactly 13 digits, or 17 characters including hyphens
static ISBN13_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\d{13}|[\d-]{17})$").expect("valid isbn13 regex"));

fn rule_error(code: &'static str, message: &str, value: serde_json::Value) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.to_string().into());
    err.add_param("value".into(), &value);
    err
}

pub fn validate_isbn(value: &str) -> Result<(), ValidationError> {
    if ISBN_RE.is_match(value) {
        Ok(())
    } else {
        Err(rule_error(
            "isbn",
            "ISBN must be 10 or 13 digits, or 13-17 characters including hyphens",
            serde_json::Value::String(value.to_string()),
        ))
    }
}

pub fn validate_isbn13(value: &str) -> Result<(), ValidationError> {
    if ISBN13_RE.is_match(value) {
        Ok(())
    } else {
        Err(rule_error(
            "isbn13",
            "ISBN-13 must be exactly 13 digits, or 17 characters including hyphens",
            serde_json::Value::String(value.to_string()),
        ))
    }
}

/// Price must be strictly positive with at most two decimal places
pub fn validate_price(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_positive() && !value.is_zero() && value.scale() <= 2 {
        Ok(())
    } else {
        Err(rule_error(
            "price",
            "Price must be greater than 0 with at most two decimal places",
            serde_json::json!(value.to_string()),
        ))
    }
}

/// Discount price may be zero but never negative
pub fn validate_discount_price(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() || value.scale() > 2 {
        Err(rule_error(
            "discount_price",
            "Discount price must be 0 or greater with at most two decimal places",
            serde_json::json!(value.to_string()),
        ))
    } else {
        Ok(())
    }
}

/// Free-form map: any JSON object is accepted, nothing else is
pub fn validate_object(value: &serde_json::Value) -> Result<(), ValidationError> {
    if value.is_object() {
        Ok(())
    } else {
        Err(rule_error(
            "object",
            "Must be a JSON object",
            value.clone(),
        ))
    }
}

/// Every element must be a well-formed UUID; the check fails atomically,
/// reporting the first malformed element.
pub fn validate_uuid_list(values: &Vec<String>) -> Result<(), ValidationError> {
    for value in values {
        if Uuid::parse_str(value).is_err() {
            return Err(rule_error(
                "uuid",
                "Must be a list of valid UUIDs",
                serde_json::Value::String(value.clone()),
            ));
        }
    }
    Ok(())
}

/// Parse a pre-validated identifier list into typed UUIDs. `field` is the
/// wire-facing field name reported on failure.
pub fn parse_uuid_list(field: &str, values: &[String]) -> AppResult<Vec<Uuid>> {
    values
        .iter()
        .map(|v| {
            Uuid::parse_str(v).map_err(|_| {
                AppError::Validation(vec![FieldError {
                    field: field.to_string(),
                    message: "Must be a valid UUID".to_string(),
                    value: Some(serde_json::Value::String(v.clone())),
                }])
            })
        })
        .collect()
}

/// Request field names in the order the request structs declare them.
/// Fields shared between structs appear once; within any one struct the
/// relative order matches its declaration.
const FIELD_ORDER: &[&str] = &[
    "isbn",
    "isbn13",
    "title",
    "subtitle",
    "email",
    "password",
    "name",
    "bio",
    "photo_url",
    "birth_date",
    "slug",
    "description",
    "publisher",
    "edition",
    "language",
    "publication_date",
    "page_count",
    "format",
    "price",
    "discount_price",
    "stock_quantity",
    "cover_image_url",
    "preview_url",
    "additional_info",
    "is_featured",
    "is_active",
    "parent_id",
    "author_ids",
    "category_ids",
    "page",
    "limit",
    "search",
];

fn field_position(field: &str) -> usize {
    FIELD_ORDER
        .iter()
        .position(|f| *f == field)
        .unwrap_or(FIELD_ORDER.len())
}

/// Convert a Rust field identifier to its camelCase wire name
fn wire_field(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;
    for c in field.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Flatten `validator` output into the ordered field error list.
///
/// `ValidationErrors` aggregates per field in a map, so entries are ordered by
/// [`FIELD_ORDER`] to follow field declaration order; field names are emitted
/// in camelCase to match the rest of the wire contract.
pub fn into_field_errors(errors: ValidationErrors) -> Vec<FieldError> {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by_key(|(field, _)| (field_position(field), *field));

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| FieldError {
                field: wire_field(field),
                message: err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string()),
                value: err.params.get("value").cloned(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn isbn_accepts_ten_and_thirteen_digits() {
        assert!(validate_isbn("0306406152").is_ok());
        assert!(validate_isbn("9780306406157").is_ok());
        assert!(validate_isbn("978-0-306-40615-7").is_ok());
    }

    #[test]
    fn isbn_rejects_garbage() {
        assert!(validate_isbn("123").is_err());
        assert!(validate_isbn("not-an-isbn").is_err());
        assert!(validate_isbn("12345678901234567890").is_err());
    }

    #[test]
    fn isbn13_rejects_short_values() {
        let err = validate_isbn13("123").unwrap_err();
        assert_eq!(
            err.params.get("value"),
            Some(&serde_json::Value::String("123".to_string()))
        );
        assert!(validate_isbn13("9780306406157").is_ok());
        assert!(validate_isbn13("978-0-306-40615-7").is_ok());
    }

    #[test]
    fn price_must_be_positive_currency() {
        assert!(validate_price(&dec("19.99")).is_ok());
        assert!(validate_price(&dec("0")).is_err());
        assert!(validate_price(&dec("-1.50")).is_err());
        assert!(validate_price(&dec("9.999")).is_err());
    }

    #[test]
    fn discount_may_be_zero_but_not_negative() {
        assert!(validate_discount_price(&dec("0")).is_ok());
        assert!(validate_discount_price(&dec("4.50")).is_ok());
        assert!(validate_discount_price(&dec("-0.01")).is_err());
    }

    #[test]
    fn uuid_list_reports_first_invalid_element() {
        let ids = vec![
            Uuid::new_v4().to_string(),
            "oops".to_string(),
            "also-bad".to_string(),
        ];
        let err = validate_uuid_list(&ids).unwrap_err();
        assert_eq!(
            err.params.get("value"),
            Some(&serde_json::Value::String("oops".to_string()))
        );
        assert!(validate_uuid_list(&vec![Uuid::new_v4().to_string()]).is_ok());
    }

    #[test]
    fn field_errors_use_wire_casing() {
        let mut errors = ValidationErrors::new();
        errors.add("cover_image_url", ValidationError::new("url"));

        let fields = into_field_errors(errors);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].field, "coverImageUrl");
    }

    #[test]
    fn field_errors_follow_declaration_order() {
        let mut errors = ValidationErrors::new();
        errors.add("cover_image_url", ValidationError::new("url"));
        errors.add("price", ValidationError::new("price"));
        errors.add("title", ValidationError::new("length"));

        let fields: Vec<_> = into_field_errors(errors)
            .into_iter()
            .map(|e| e.field)
            .collect();
        assert_eq!(fields, vec!["title", "price", "coverImageUrl"]);
    }

    #[test]
    fn additional_info_must_be_an_object() {
        assert!(validate_object(&serde_json::json!({"k": "v"})).is_ok());
        assert!(validate_object(&serde_json::json!([1, 2])).is_err());
        assert!(validate_object(&serde_json::json!("string")).is_err());
    }
}
