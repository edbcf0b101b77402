//! API integration tests
//!
//! These run against a live server (`cargo run`) with a migrated database.
//! Run with: cargo test -- --ignored

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api";

/// Unique suffix so repeated runs don't trip unique constraints
fn unique_suffix() -> u128 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos()
}

async fn create_book(client: &Client, isbn: &str, copies: i32) -> i64 {
    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({
            "isbn": isbn,
            "title": "Integration Test Book",
            "author": "Test Author",
            "category": "Fiction",
            "copies_available": copies,
            "total_copies": copies
        }))
        .send()
        .await
        .expect("Failed to create book");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_i64().expect("No book ID")
}

async fn create_member(client: &Client, email: &str) -> i64 {
    let response = client
        .post(format!("{}/members", BASE_URL))
        .json(&json!({
            "name": "Test Member",
            "email": email
        }))
        .send()
        .await
        .expect("Failed to create member");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_i64().expect("No member ID")
}

async fn get_book(client: &Client, id: i64) -> Value {
    client
        .get(format!("{}/books/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to fetch book")
        .json()
        .await
        .expect("Failed to parse book")
}

async fn borrow(client: &Client, book_id: i64, member_id: i64) -> reqwest::Response {
    client
        .post(format!("{}/loans", BASE_URL))
        .json(&json!({
            "book_id": book_id,
            "member_id": member_id,
            "borrow_date": "2024-06-01",
            "due_date": "2024-06-15"
        }))
        .send()
        .await
        .expect("Failed to send loan request")
}

#[tokio::test]
#[ignore]
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
async fn test_book_search_requires_query() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books/search", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_short_suggestion_query_returns_empty_sets() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books/suggestions?q=a", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["titles"].as_array().expect("titles").len(), 0);
    assert_eq!(body["authors"].as_array().expect("authors").len(), 0);
    assert_eq!(body["categories"].as_array().expect("categories").len(), 0);
}

#[tokio::test]
#[ignore]
async fn test_advanced_search_with_unknown_sort_field() {
    let client = Client::new();

    // Unknown sort fields fall back to the default instead of erroring
    let response = client
        .get(format!(
            "{}/books/advanced-search?sort_by=nonsense&sort_order=sideways",
            BASE_URL
        ))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body.is_array());
}

#[tokio::test]
#[ignore]
async fn test_stats_shape() {
    let client = Client::new();

    let response = client
        .get(format!("{}/stats", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    for key in [
        "total_members",
        "new_members_this_week",
        "total_books",
        "categories_count",
        "active_loans",
        "overdue_loans",
        "available_books",
        "returned_count",
        "borrowed_count",
        "overdue_count",
    ] {
        assert!(body[key].is_number(), "missing stats key {}", key);
    }
}

#[tokio::test]
#[ignore]
async fn test_duplicate_isbn_is_rejected() {
    let client = Client::new();
    let isbn = format!("dup-{}", unique_suffix());

    create_book(&client, &isbn, 1).await;

    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({
            "isbn": isbn,
            "title": "Duplicate",
            "author": "Someone",
            "category": "Fiction"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_borrow_return_scenario() {
    let client = Client::new();
    let suffix = unique_suffix();

    // Book with two copies, three members
    let book_id = create_book(&client, &format!("isbn-{}", suffix), 2).await;
    let member_a = create_member(&client, &format!("a-{}@test.org", suffix)).await;
    let member_b = create_member(&client, &format!("b-{}@test.org", suffix)).await;
    let member_c = create_member(&client, &format!("c-{}@test.org", suffix)).await;

    // First borrow decrements availability
    let response = borrow(&client, book_id, member_a).await;
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let loan_a = body["id"].as_i64().expect("No loan ID");
    assert_eq!(get_book(&client, book_id).await["copies_available"], 1);

    // Second borrow exhausts availability
    let response = borrow(&client, book_id, member_b).await;
    assert_eq!(response.status(), 201);
    assert_eq!(get_book(&client, book_id).await["copies_available"], 0);

    // Third borrow fails without creating a loan or touching availability
    let response = borrow(&client, book_id, member_c).await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Book is not available for loan");
    assert_eq!(get_book(&client, book_id).await["copies_available"], 0);

    // Returning the first loan frees a copy and closes the loan
    let response = client
        .post(format!("{}/loans/{}/return", BASE_URL, loan_a))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
    assert_eq!(get_book(&client, book_id).await["copies_available"], 1);

    let loan: Value = client
        .get(format!("{}/loans/{}", BASE_URL, loan_a))
        .send()
        .await
        .expect("Failed to fetch loan")
        .json()
        .await
        .expect("Failed to parse loan");
    assert_eq!(loan["status"], "Returned");
    assert!(loan["return_date"].is_string());

    // A second return of the same loan fails deterministically
    let response = client
        .post(format!("{}/loans/{}/return", BASE_URL, loan_a))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
    assert_eq!(get_book(&client, book_id).await["copies_available"], 1);
}

#[tokio::test]
#[ignore]
async fn test_member_with_open_loan_cannot_be_deleted() {
    let client = Client::new();
    let suffix = unique_suffix();

    let book_id = create_book(&client, &format!("guard-{}", suffix), 1).await;
    let member_id = create_member(&client, &format!("guard-{}@test.org", suffix)).await;

    let response = borrow(&client, book_id, member_id).await;
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let loan_id = body["id"].as_i64().expect("No loan ID");

    // Deletion refused while the loan is open
    let response = client
        .delete(format!("{}/members/{}", BASE_URL, member_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    // After the return it succeeds and cascades the loan history
    let response = client
        .post(format!("{}/loans/{}/return", BASE_URL, loan_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    let response = client
        .delete(format!("{}/members/{}", BASE_URL, member_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    let response = client
        .get(format!("{}/loans/{}", BASE_URL, loan_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_inactive_member_cannot_borrow() {
    let client = Client::new();
    let suffix = unique_suffix();

    let book_id = create_book(&client, &format!("susp-{}", suffix), 1).await;
    let member_id = create_member(&client, &format!("susp-{}@test.org", suffix)).await;

    let response = client
        .patch(format!("{}/members/{}/status", BASE_URL, member_id))
        .json(&json!({"status": "Suspended"}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    let response = borrow(&client, book_id, member_id).await;
    assert_eq!(response.status(), 400);
    assert_eq!(get_book(&client, book_id).await["copies_available"], 1);
}

#[tokio::test]
#[ignore]
async fn test_invalid_member_status_is_rejected() {
    let client = Client::new();
    let suffix = unique_suffix();
    let member_id = create_member(&client, &format!("status-{}@test.org", suffix)).await;

    let response = client
        .patch(format!("{}/members/{}/status", BASE_URL, member_id))
        .json(&json!({"status": "Cancelled"}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_negative_fine_is_rejected() {
    let client = Client::new();
    let suffix = unique_suffix();

    let book_id = create_book(&client, &format!("fine-{}", suffix), 1).await;
    let member_id = create_member(&client, &format!("fine-{}@test.org", suffix)).await;

    let response = borrow(&client, book_id, member_id).await;
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let loan_id = body["id"].as_i64().expect("No loan ID");

    let response = client
        .patch(format!("{}/loans/{}/fine", BASE_URL, loan_id))
        .json(&json!({"amount": -1.0}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    let response = client
        .patch(format!("{}/loans/{}/fine", BASE_URL, loan_id))
        .json(&json!({"amount": 2.5}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
}

#[tokio::test]
#[ignore]
async fn test_concurrent_borrows_of_last_copy() {
    let client = Client::new();
    let suffix = unique_suffix();

    let book_id = create_book(&client, &format!("race-{}", suffix), 1).await;
    let member_a = create_member(&client, &format!("race-a-{}@test.org", suffix)).await;
    let member_b = create_member(&client, &format!("race-b-{}@test.org", suffix)).await;

    // Fire both borrows at once; the row lock must let exactly one through
    let (first, second) = tokio::join!(
        borrow(&client, book_id, member_a),
        borrow(&client, book_id, member_b)
    );

    let statuses = [first.status().as_u16(), second.status().as_u16()];
    assert!(
        statuses.contains(&201) && statuses.contains(&400),
        "expected one success and one conflict, got {:?}",
        statuses
    );
    assert_eq!(get_book(&client, book_id).await["copies_available"], 0);
}

#[tokio::test]
#[ignore]
async fn test_register_and_login() {
    let client = Client::new();
    let suffix = unique_suffix();
    let email = format!("auth-{}@test.org", suffix);

    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "name": "Auth Tester",
            "email": email,
            "password": "correct horse battery"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    // Wrong password is rejected
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({"email": email, "password": "wrong"}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 401);

    // Correct password yields a usable bearer token
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({"email": email, "password": "correct horse battery"}))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["token_type"], "Bearer");
    let token = body["token"].as_str().expect("No token in response");

    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let me: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(me["email"], email.as_str());
    assert!(me.get("password_hash").is_none());
}
