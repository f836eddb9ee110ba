//! Book model and related request/response types.
//!
//! JSON field names are camelCase on the wire; the database columns stay
//! snake_case. Relation arrays (`authors`, `categories`) are loaded
//! separately from the join tables and omitted from responses when the
//! fetch did not request them.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Physical or digital form of a book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookFormat {
    Hardcover,
    Paperback,
    Ebook,
    Audiobook,
}

impl BookFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookFormat::Hardcover => "HARDCOVER",
            BookFormat::Paperback => "PAPERBACK",
            BookFormat::Ebook => "EBOOK",
            BookFormat::Audiobook => "AUDIOBOOK",
        }
    }
}

impl std::fmt::Display for BookFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BookFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "HARDCOVER" => Ok(BookFormat::Hardcover),
            "PAPERBACK" => Ok(BookFormat::Paperback),
            "EBOOK" => Ok(BookFormat::Ebook),
            "AUDIOBOOK" => Ok(BookFormat::Audiobook),
            _ => Err(format!("Invalid book format: {}", s)),
        }
    }
}

// SQLx conversion: stored as TEXT
impl sqlx::Type<Postgres> for BookFormat {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for BookFormat {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for BookFormat {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_str().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

/// Credited author entry in a shaped book, ordered by `order` ascending
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookAuthorEntry {
    pub id: uuid::Uuid,
    pub name: String,
    /// 1-indexed position matching the order supplied at creation
    pub order: i16,
}

/// Category entry in a shaped book, primary category first
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookCategoryEntry {
    pub id: uuid::Uuid,
    pub name: String,
    pub slug: String,
    pub is_primary: bool,
}

/// Full book model (DB + API)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: uuid::Uuid,
    pub isbn: Option<String>,
    pub isbn13: Option<String>,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: String,
    pub publisher: Option<String>,
    pub edition: Option<String>,
    pub language: String,
    pub publication_date: Option<NaiveDate>,
    pub page_count: Option<i32>,
    pub format: BookFormat,
    #[schema(value_type = f64)]
    pub price: Decimal,
    #[schema(value_type = Option<f64>)]
    pub discount_price: Option<Decimal>,
    pub stock_quantity: i32,
    pub cover_image_url: String,
    pub preview_url: Option<String>,
    /// Populated by the rating subsystem, never by catalog writes
    #[schema(value_type = f64)]
    pub average_rating: Decimal,
    pub ratings_count: i32,
    pub additional_info: serde_json::Value,
    pub is_featured: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    // Relations (loaded separately from the join tables)
    #[sqlx(skip)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<BookAuthorEntry>>,
    #[sqlx(skip)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<BookCategoryEntry>>,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBook {
    #[validate(custom(function = "crate::validation::validate_isbn"))]
    pub isbn: Option<String>,
    #[validate(custom(function = "crate::validation::validate_isbn13"))]
    pub isbn13: Option<String>,
    #[validate(length(min = 1, max = 500, message = "Title must be 1-500 characters"))]
    pub title: String,
    #[validate(length(max = 500, message = "Subtitle must be at most 500 characters"))]
    pub subtitle: Option<String>,
    #[validate(length(min = 1, message = "Description must not be empty"))]
    pub description: String,
    pub publisher: Option<String>,
    pub edition: Option<String>,
    /// Defaults to "en" when absent
    pub language: Option<String>,
    pub publication_date: Option<NaiveDate>,
    #[validate(range(min = 1, message = "Page count must be a positive integer"))]
    pub page_count: Option<i32>,
    pub format: BookFormat,
    #[validate(custom(function = "crate::validation::validate_price"))]
    #[schema(value_type = f64)]
    pub price: Decimal,
    #[validate(custom(function = "crate::validation::validate_discount_price"))]
    #[schema(value_type = Option<f64>)]
    pub discount_price: Option<Decimal>,
    #[validate(range(min = 0, message = "Stock quantity must be 0 or greater"))]
    pub stock_quantity: Option<i32>,
    #[validate(url(message = "Cover image URL must be a valid URL"))]
    pub cover_image_url: String,
    #[validate(url(message = "Preview URL must be a valid URL"))]
    pub preview_url: Option<String>,
    #[validate(custom(function = "crate::validation::validate_object"))]
    pub additional_info: Option<serde_json::Value>,
    pub is_featured: Option<bool>,
    pub is_active: Option<bool>,
    /// Existing author identifiers, credited in the given order
    #[validate(custom(function = "crate::validation::validate_uuid_list"))]
    pub author_ids: Option<Vec<String>>,
    /// Existing category identifiers; the first becomes the primary category
    #[validate(custom(function = "crate::validation::validate_uuid_list"))]
    pub category_ids: Option<Vec<String>>,
}

/// Update book request. Every field is optional and validated only when
/// present; author/category linkage is not re-derived by updates.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBook {
    #[validate(custom(function = "crate::validation::validate_isbn"))]
    pub isbn: Option<String>,
    #[validate(custom(function = "crate::validation::validate_isbn13"))]
    pub isbn13: Option<String>,
    #[validate(length(min = 1, max = 500, message = "Title must be 1-500 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 500, message = "Subtitle must be at most 500 characters"))]
    pub subtitle: Option<String>,
    #[validate(length(min = 1, message = "Description must not be empty"))]
    pub description: Option<String>,
    pub publisher: Option<String>,
    pub edition: Option<String>,
    pub language: Option<String>,
    pub publication_date: Option<NaiveDate>,
    #[validate(range(min = 1, message = "Page count must be a positive integer"))]
    pub page_count: Option<i32>,
    pub format: Option<BookFormat>,
    #[validate(custom(function = "crate::validation::validate_price"))]
    #[schema(value_type = Option<f64>)]
    pub price: Option<Decimal>,
    #[validate(custom(function = "crate::validation::validate_discount_price"))]
    #[schema(value_type = Option<f64>)]
    pub discount_price: Option<Decimal>,
    #[validate(range(min = 0, message = "Stock quantity must be 0 or greater"))]
    pub stock_quantity: Option<i32>,
    #[validate(url(message = "Cover image URL must be a valid URL"))]
    pub cover_image_url: Option<String>,
    #[validate(url(message = "Preview URL must be a valid URL"))]
    pub preview_url: Option<String>,
    #[validate(custom(function = "crate::validation::validate_object"))]
    pub additional_info: Option<serde_json::Value>,
    pub is_featured: Option<bool>,
    pub is_active: Option<bool>,
}

/// Book listing query parameters
#[derive(Debug, Default, Deserialize, Validate, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookQuery {
    #[validate(range(min = 1, message = "Page must be 1 or greater"))]
    pub page: Option<i64>,
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    pub limit: Option<i64>,
    /// Case-insensitive substring match against the title
    #[validate(length(max = 100, message = "Search term must be at most 100 characters"))]
    pub search: Option<String>,
    pub format: Option<BookFormat>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
}

impl BookQuery {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(20)
    }

    /// Row offset for the requested page; saturates instead of overflowing
    /// on absurd page numbers
    pub fn offset(&self) -> i64 {
        self.page().saturating_sub(1).saturating_mul(self.limit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::into_field_errors;
    use validator::Validate;

    fn valid_create() -> CreateBook {
        serde_json::from_value(serde_json::json!({
            "title": "The Rust Programming Language",
            "description": "The official book on Rust.",
            "format": "PAPERBACK",
            "price": "39.99",
            "coverImageUrl": "https://covers.example.com/trpl.jpg"
        }))
        .unwrap()
    }

    #[test]
    fn format_round_trips_through_strings() {
        for f in [
            BookFormat::Hardcover,
            BookFormat::Paperback,
            BookFormat::Ebook,
            BookFormat::Audiobook,
        ] {
            assert_eq!(f.as_str().parse::<BookFormat>().unwrap(), f);
        }
        assert!("VINYL".parse::<BookFormat>().is_err());
    }

    #[test]
    fn minimal_creation_payload_is_valid() {
        assert!(valid_create().validate().is_ok());
    }

    #[test]
    fn short_isbn13_fails_naming_the_field() {
        let mut create = valid_create();
        create.isbn13 = Some("123".to_string());

        let errors = into_field_errors(create.validate().unwrap_err());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "isbn13");
        assert_eq!(
            errors[0].value,
            Some(serde_json::Value::String("123".to_string()))
        );
    }

    #[test]
    fn all_failing_fields_are_enumerated() {
        let mut create = valid_create();
        create.title = "x".repeat(501);
        create.price = "-1".parse().unwrap();
        create.cover_image_url = "not a url".to_string();

        let errors = into_field_errors(create.validate().unwrap_err());
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "price", "coverImageUrl"]);
    }

    #[test]
    fn update_payload_validates_only_present_fields() {
        let update: UpdateBook = serde_json::from_value(serde_json::json!({
            "stockQuantity": 5
        }))
        .unwrap();
        assert!(update.validate().is_ok());

        let bad: UpdateBook = serde_json::from_value(serde_json::json!({
            "price": "0"
        }))
        .unwrap();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn listing_query_bounds() {
        let q = BookQuery {
            page: Some(0),
            ..Default::default()
        };
        assert!(q.validate().is_err());

        let q = BookQuery {
            limit: Some(101),
            ..Default::default()
        };
        assert!(q.validate().is_err());

        let q = BookQuery {
            page: Some(3),
            limit: Some(100),
            search: Some("rust".to_string()),
            ..Default::default()
        };
        assert!(q.validate().is_ok());
        assert_eq!(q.page(), 3);

        assert_eq!(BookQuery::default().limit(), 20);
    }

    #[test]
    fn absurd_page_offset_saturates_instead_of_overflowing() {
        let q = BookQuery {
            page: Some(i64::MAX),
            limit: Some(100),
            ..Default::default()
        };
        assert_eq!(q.offset(), i64::MAX);

        let q = BookQuery {
            page: Some(3),
            limit: Some(20),
            ..Default::default()
        };
        assert_eq!(q.offset(), 40);
    }

    #[test]
    fn book_serializes_camel_case_and_omits_unfetched_relations() {
        let book = Book {
            id: uuid::Uuid::new_v4(),
            isbn: None,
            isbn13: None,
            title: "T".to_string(),
            subtitle: None,
            description: "d".to_string(),
            publisher: None,
            edition: None,
            language: "en".to_string(),
            publication_date: None,
            page_count: None,
            format: BookFormat::Ebook,
            price: "9.99".parse().unwrap(),
            discount_price: None,
            stock_quantity: 0,
            cover_image_url: "https://example.com/c.jpg".to_string(),
            preview_url: None,
            average_rating: "0".parse().unwrap(),
            ratings_count: 0,
            additional_info: serde_json::json!({}),
            is_featured: false,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            authors: None,
            categories: None,
        };

        let json = serde_json::to_value(&book).unwrap();
        assert_eq!(json["format"], "EBOOK");
        assert!(json.get("coverImageUrl").is_some());
        assert!(json.get("authors").is_none());
        assert!(json.get("categories").is_none());
    }
}
