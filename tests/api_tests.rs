//! API integration tests
//!
//! Requires a running server with a seeded admin account
//! (admin@example.com / admin-password).

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Helper to get an authenticated admin token
async fn get_admin_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": "admin@example.com",
            "password": "admin-password"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["data"]["token"]
        .as_str()
        .expect("No token in response")
        .to_string()
}

fn sample_book(title: &str) -> Value {
    json!({
        "title": title,
        "description": "An integration test book.",
        "format": "PAPERBACK",
        "price": "19.99",
        "coverImageUrl": "https://covers.example.com/test.jpg"
    })
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_readiness_reports_database() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "ready");
    assert_eq!(body["database"], "up");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": "admin@example.com",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
#[ignore]
async fn test_books_require_token() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_customer_cannot_create_books() {
    let client = Client::new();

    let email = format!("customer-{}@example.com", uuid_suffix());
    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "email": email,
            "password": "customer-password",
            "name": "Test Customer"
        }))
        .send()
        .await
        .expect("Failed to register");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    let token = body["data"]["token"].as_str().expect("No token");

    let response = client
        .post(format!("{}/books", BASE_URL))
        .bearer_auth(token)
        .json(&sample_book("Forbidden Book"))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_create_and_get_book_round_trip() {
    let client = Client::new();
    let token = get_admin_token(&client).await;

    let response = client
        .post(format!("{}/books", BASE_URL))
        .bearer_auth(&token)
        .json(&sample_book("Round Trip"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let created: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(created["success"], true);
    let book = &created["data"];
    let id = book["id"].as_str().expect("No book id");
    assert_eq!(book["language"], "en");
    assert!(book["authors"].is_array());
    assert!(book["categories"].is_array());

    let response = client
        .get(format!("{}/books/{}", BASE_URL, id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let fetched: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(fetched["data"], created["data"]);
}

#[tokio::test]
#[ignore]
async fn test_duplicate_isbn_conflicts() {
    let client = Client::new();
    let token = get_admin_token(&client).await;

    let isbn13 = random_isbn13();
    let mut book = sample_book("Original");
    book["isbn13"] = json!(isbn13);

    let response = client
        .post(format!("{}/books", BASE_URL))
        .bearer_auth(&token)
        .json(&book)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let mut dup = sample_book("Duplicate");
    dup["isbn13"] = json!(isbn13);

    let response = client
        .post(format!("{}/books", BASE_URL))
        .bearer_auth(&token)
        .json(&dup)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
#[ignore]
async fn test_short_isbn13_fails_validation() {
    let client = Client::new();
    let token = get_admin_token(&client).await;

    let mut book = sample_book("Bad ISBN");
    book["isbn13"] = json!("123");

    let response = client
        .post(format!("{}/books", BASE_URL))
        .bearer_auth(&token)
        .json(&book)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    let errors = body["error"]["errors"].as_array().expect("No field errors");
    assert!(errors.iter().any(|e| e["field"] == "isbn13"));
}

#[tokio::test]
#[ignore]
async fn test_unknown_author_reference_is_rejected() {
    let client = Client::new();
    let token = get_admin_token(&client).await;

    // Well-formed UUID that matches no author row
    let mut book = sample_book("Ghost Author");
    book["authorIds"] = json!([uuid::Uuid::new_v4().to_string()]);

    let response = client
        .post(format!("{}/books", BASE_URL))
        .bearer_auth(&token)
        .json(&book)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
#[ignore]
async fn test_validation_errors_name_wire_fields() {
    let client = Client::new();
    let token = get_admin_token(&client).await;

    let mut book = sample_book("Bad Cover");
    book["coverImageUrl"] = json!("not a url");

    let response = client
        .post(format!("{}/books", BASE_URL))
        .bearer_auth(&token)
        .json(&book)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Failed to parse response");
    let errors = body["error"]["errors"].as_array().expect("No field errors");
    assert!(errors.iter().any(|e| e["field"] == "coverImageUrl"));
}

#[tokio::test]
#[ignore]
async fn test_author_order_and_primary_category() {
    let client = Client::new();
    let token = get_admin_token(&client).await;

    let mut author_ids = Vec::new();
    for name in ["Second Credited", "First Credited"] {
        let response = client
            .post(format!("{}/authors", BASE_URL))
            .bearer_auth(&token)
            .json(&json!({"name": name}))
            .send()
            .await
            .expect("Failed to create author");
        assert_eq!(response.status(), 201);
        let body: Value = response.json().await.unwrap();
        author_ids.push(body["data"]["id"].as_str().unwrap().to_string());
    }

    let mut category_ids = Vec::new();
    for _ in 0..2 {
        let suffix = uuid_suffix();
        let response = client
            .post(format!("{}/categories", BASE_URL))
            .bearer_auth(&token)
            .json(&json!({
                "name": format!("Genre {}", suffix),
                "slug": format!("genre-{}", suffix)
            }))
            .send()
            .await
            .expect("Failed to create category");
        assert_eq!(response.status(), 201);
        let body: Value = response.json().await.unwrap();
        category_ids.push(body["data"]["id"].as_str().unwrap().to_string());
    }

    let mut book = sample_book("Ordered Relations");
    book["authorIds"] = json!(author_ids);
    book["categoryIds"] = json!(category_ids);

    let response = client
        .post(format!("{}/books", BASE_URL))
        .bearer_auth(&token)
        .json(&book)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.unwrap();
    let authors = body["data"]["authors"].as_array().unwrap();
    assert_eq!(authors[0]["id"], author_ids[0].as_str());
    assert_eq!(authors[0]["order"], 1);
    assert_eq!(authors[1]["id"], author_ids[1].as_str());
    assert_eq!(authors[1]["order"], 2);

    let categories = body["data"]["categories"].as_array().unwrap();
    assert_eq!(categories[0]["id"], category_ids[0].as_str());
    assert_eq!(categories[0]["isPrimary"], true);
    assert_eq!(categories[1]["isPrimary"], false);
}

#[tokio::test]
#[ignore]
async fn test_list_books_pagination_shape() {
    let client = Client::new();
    let token = get_admin_token(&client).await;

    let response = client
        .get(format!("{}/books?page=1&limit=5", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"]["books"].is_array());
    let pagination = &body["data"]["pagination"];
    assert_eq!(pagination["page"], 1);
    assert_eq!(pagination["limit"], 5);
    assert!(pagination["total"].is_number());
    assert!(pagination["totalPages"].is_number());
}

#[tokio::test]
#[ignore]
async fn test_list_rejects_oversized_limit() {
    let client = Client::new();
    let token = get_admin_token(&client).await;

    let response = client
        .get(format!("{}/books?limit=101", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_partial_update_preserves_other_fields() {
    let client = Client::new();
    let token = get_admin_token(&client).await;

    let response = client
        .post(format!("{}/books", BASE_URL))
        .bearer_auth(&token)
        .json(&sample_book("Partial Update"))
        .send()
        .await
        .expect("Failed to send request");
    let created: Value = response.json().await.unwrap();
    let id = created["data"]["id"].as_str().unwrap();

    let response = client
        .put(format!("{}/books/{}", BASE_URL, id))
        .bearer_auth(&token)
        .json(&json!({"stockQuantity": 5}))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated["data"]["stockQuantity"], 5);
    assert_eq!(updated["data"]["title"], "Partial Update");
    assert_eq!(updated["data"]["price"], created["data"]["price"]);
}

#[tokio::test]
#[ignore]
async fn test_delete_is_terminal() {
    let client = Client::new();
    let token = get_admin_token(&client).await;

    let response = client
        .post(format!("{}/books", BASE_URL))
        .bearer_auth(&token)
        .json(&sample_book("To Delete"))
        .send()
        .await
        .expect("Failed to send request");
    let created: Value = response.json().await.unwrap();
    let id = created["data"]["id"].as_str().unwrap();

    let response = client
        .delete(format!("{}/books/{}", BASE_URL, id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    // Second delete and subsequent fetch both report NotFound
    let response = client
        .delete(format!("{}/books/{}", BASE_URL, id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);

    let response = client
        .get(format!("{}/books/{}", BASE_URL, id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}

fn uuid_suffix() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .subsec_nanos();
    format!("{}{}", std::process::id(), nanos)
}

fn random_isbn13() -> String {
    let suffix = uuid_suffix();
    let digits: String = suffix.chars().filter(|c| c.is_ascii_digit()).collect();
    format!("978{:0>10}", &digits[..digits.len().min(10)])
}
