//! API integration tests
//!
//! These run against a live server backed by PostgreSQL.

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Suffix keeping ISBNs and emails unique across runs
fn unique_suffix() -> String {
    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("{:013}", nanos.rem_euclid(10_000_000_000_000))
}

async fn create_book(client: &Client, isbn: &str) -> Value {
    let response = client
        .post(format!("{}/book", BASE_URL))
        .json(&json!({
            "title": "The Left Hand of Darkness",
            "author": "Ursula K. Le Guin",
            "isbn": isbn,
            "genre": "Science fiction",
            "publication_date": "1969-03-01"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["items"]
        .as_array()
        .and_then(|items| items.iter().find(|b| b["isbn"] == isbn))
        .cloned()
        .expect("Created book missing from list")
}

async fn create_user(client: &Client, email: &str) -> Value {
    let response = client
        .post(format!("{}/user", BASE_URL))
        .json(&json!({
            "first_name": "Grace",
            "middle_name": "Brewster",
            "last_name": "Hopper",
            "email": email,
            "contact_no": "555-0199",
            "role": "member"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["items"]
        .as_array()
        .and_then(|items| items.iter().find(|u| u["email"] == email))
        .cloned()
        .expect("Created user missing from list")
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
async fn test_readiness_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore]
async fn test_book_crud() {
    let client = Client::new();
    let isbn = unique_suffix();

    let book = create_book(&client, &isbn).await;
    let id = book["id"].as_i64().expect("No book id");

    let response = client
        .post(format!("{}/book", BASE_URL))
        .json(&json!({
            "title": "Duplicate",
            "author": "Someone",
            "isbn": isbn,
            "genre": "Other",
            "publication_date": "2000-01-01"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = client
        .put(format!("{}/book/{}", BASE_URL, id))
        .json(&json!({
            "title": "The Dispossessed",
            "author": "Ursula K. Le Guin",
            "isbn": isbn,
            "genre": "Science fiction",
            "publication_date": "1974-05-01"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Book updated successfully");

    let response = client
        .delete(format!("{}/book/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .delete(format!("{}/book/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_user_validation() {
    let client = Client::new();

    let response = client
        .post(format!("{}/user", BASE_URL))
        .json(&json!({
            "first_name": "",
            "last_name": "Hopper",
            "email": "not-an-email",
            "contact_no": "555-0199",
            "role": "member"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["fields"]["first_name"].is_array());
    assert!(body["fields"]["email"].is_array());
}

#[tokio::test]
#[ignore]
async fn test_borrow_flow() {
    let client = Client::new();
    let suffix = unique_suffix();

    let book = create_book(&client, &suffix).await;
    let user = create_user(&client, &format!("grace.{}@example.com", suffix)).await;
    let issue = json!({
        "user_id": user["id"],
        "book_id": book["id"],
        "issue_date": "2024-03-01",
        "due_date": "2024-03-15"
    });

    let response = client
        .post(format!("{}/borrow", BASE_URL))
        .json(&issue)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let page: Value = response.json().await.expect("Failed to parse response");
    let borrowing = page["borrowings"]
        .as_array()
        .and_then(|rows| rows.iter().find(|b| b["book_id"] == book["id"]))
        .cloned()
        .expect("Borrowing missing from page");
    assert_eq!(borrowing["user_name"], "Grace Brewster Hopper");

    let response = client
        .post(format!("{}/borrow", BASE_URL))
        .json(&issue)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = client
        .post(format!("{}/borrow/{}/return", BASE_URL, borrowing["id"]))
        .json(&json!({ "return_date": "2024-03-10" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .delete(format!("{}/book/{}", BASE_URL, book["id"]))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
