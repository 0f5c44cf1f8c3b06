//! API integration tests
//!
//! These tests require a running server on localhost:8080 with a clean
//! database. Run with: cargo test --test api_tests -- --ignored

use reqwest::Client;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

const BASE_URL: &str = "http://localhost:8080/api/v1";

static SEQ: AtomicU64 = AtomicU64::new(0);

/// Unique suffix so tests can run repeatedly against the same database
fn unique() -> u128 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    nanos + SEQ.fetch_add(1, Ordering::Relaxed) as u128
}

/// Create a user and return (id, email)
async fn create_user(client: &Client) -> (i64, String) {
    let email = format!("reader{}@example.com", unique());

    let response = client
        .post(format!("{}/users", BASE_URL))
        .json(&json!({
            "email": email,
            "username": "testreader",
            "password": "securepassword"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    (body["id"].as_i64().expect("No user ID"), email)
}

/// Log a user in and return the bearer token
async fn login(client: &Client, email: &str) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": email,
            "password": "securepassword"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["access_token"]
        .as_str()
        .expect("No token in response")
        .to_string()
}

/// Create a book with a unique ISBN and return its id
async fn create_book(client: &Client, token: &str) -> i64 {
    let isbn = format!("{:013}", unique() % 10_000_000_000_000);

    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": "Test Book",
            "author": "Test Author",
            "isbn": isbn
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["is_available"], true);
    body["id"].as_i64().expect("No book ID")
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
async fn test_signup_login_and_me() {
    let client = Client::new();
    let (user_id, email) = create_user(&client).await;
    let token = login(&client, &email).await;

    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["id"].as_i64(), Some(user_id));
    assert_eq!(body["email"], email.as_str());
    // The password hash must never be serialized
    assert!(body.get("password").is_none());
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();
    let (_, email) = create_user(&client).await;

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": email,
            "password": "wrongpassword"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_signup_rejects_short_password() {
    let client = Client::new();

    let response = client
        .post(format!("{}/users", BASE_URL))
        .json(&json!({
            "email": format!("reader{}@example.com", unique()),
            "username": "testreader",
            "password": "short"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_signup_rejects_duplicate_email() {
    let client = Client::new();
    let (_, email) = create_user(&client).await;

    let response = client
        .post(format!("{}/users", BASE_URL))
        .json(&json!({
            "email": email,
            "username": "testreader",
            "password": "securepassword"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_create_book_rejects_bad_isbn() {
    let client = Client::new();
    let (_, email) = create_user(&client).await;
    let token = login(&client, &email).await;

    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": "Test Book",
            "author": "Test Author",
            "isbn": "12345"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_borrow_and_return_flow() {
    let client = Client::new();
    let (user_id, email) = create_user(&client).await;
    let token = login(&client, &email).await;
    let book_id = create_book(&client, &token).await;

    // Borrow the book
    let response = client
        .post(format!("{}/books/{}/borrow", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "user_id": user_id }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let record: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(record["book_id"].as_i64(), Some(book_id));
    assert_eq!(record["user_id"].as_i64(), Some(user_id));
    assert!(record["return_date"].is_null());

    // A second borrow of the same book must conflict
    let response = client
        .post(format!("{}/books/{}/borrow", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "user_id": user_id }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 409);

    // The book shows up in the borrowed listing
    let response = client
        .get(format!("{}/books/borrowed", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let borrowed: Value = response.json().await.expect("Failed to parse response");
    let found = borrowed
        .as_array()
        .expect("Expected array")
        .iter()
        .any(|b| b["id"].as_i64() == Some(book_id));
    assert!(found);

    // Return the book
    let response = client
        .post(format!("{}/books/{}/return", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "user_id": user_id }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let book: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(book["id"].as_i64(), Some(book_id));
    assert_eq!(book["is_available"], true);

    // A second return has no open record to match
    let response = client
        .post(format!("{}/books/{}/return", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "user_id": user_id }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_borrow_missing_book() {
    let client = Client::new();
    let (user_id, email) = create_user(&client).await;
    let token = login(&client, &email).await;

    let response = client
        .post(format!("{}/books/999999999/borrow", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "user_id": user_id }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_user_borrows_listing() {
    let client = Client::new();
    let (user_id, email) = create_user(&client).await;
    let token = login(&client, &email).await;
    let book_id = create_book(&client, &token).await;

    let response = client
        .post(format!("{}/books/{}/borrow", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "user_id": user_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let response = client
        .get(format!("{}/users/{}/borrows", BASE_URL, user_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let borrows: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(borrows.as_array().map(|a| a.len()), Some(1));
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}
