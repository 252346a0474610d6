//! API integration tests
//!
//! These run against a live server with a migrated database:
//! `cargo test -- --ignored`

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Register a throwaway staff account and return its bearer token
async fn get_staff_token(client: &Client) -> String {
    let email = format!("staff-{}@test.local", std::process::id());

    let _ = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "name": "Test Staff",
            "email": email,
            "password": "staff-password",
            "role": "staff"
        }))
        .send()
        .await
        .expect("Failed to send register request");

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": email,
            "password": "staff-password"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

/// Create a book with a unique title; returns (id, title)
async fn create_test_book(client: &Client, token: &str, copies: i32) -> (i64, String) {
    let title = format!("Integration Test Novel {}", rand_suffix());

    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": title,
            "author": "Test Author",
            "genre": "Test",
            "publication_year": "2024",
            "classification": "T 001",
            "shelf_location": "T1",
            "publisher": "Test Press",
            "nb_copies": copies
        }))
        .send()
        .await
        .expect("Failed to create book");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse book");
    (body["id"].as_i64().expect("No book id"), title)
}

fn rand_suffix() -> u128 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos()
}

async fn get_book(client: &Client, id: i64) -> Value {
    client
        .get(format!("{}/books/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to get book")
        .json()
        .await
        .expect("Failed to parse book")
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
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .get(format!("{}/loans", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": "nobody@test.local",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_checkout_terminate_round_trip() {
    let client = Client::new();
    let token = get_staff_token(&client).await;
    let (book_id, title) = create_test_book(&client, &token, 2).await;

    let before = get_book(&client, book_id).await;
    assert_eq!(before["nb_available"], 2);

    // Checkout decrements availability and sets due 30 days out
    let response = client
        .post(format!("{}/loans", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": title,
            "checkout_date": "2024-01-01"
        }))
        .send()
        .await
        .expect("Failed to checkout");

    assert_eq!(response.status(), 201);
    let loan: Value = response.json().await.expect("Failed to parse loan");
    assert_eq!(loan["due_date"], "2024-01-31");
    let loan_id = loan["id"].as_i64().expect("No loan id");

    let during = get_book(&client, book_id).await;
    assert_eq!(during["nb_available"], 1);

    // Terminate restores the copy
    let response = client
        .post(format!("{}/loans/{}/terminate", BASE_URL, loan_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to terminate");

    assert!(response.status().is_success());

    let after = get_book(&client, book_id).await;
    assert_eq!(after["nb_available"], 2);
}

#[tokio::test]
#[ignore]
async fn test_terminate_twice_is_refused() {
    let client = Client::new();
    let token = get_staff_token(&client).await;
    let (book_id, title) = create_test_book(&client, &token, 2).await;

    // Two open loans take both copies
    for _ in 0..2 {
        let response = client
            .post(format!("{}/loans", BASE_URL))
            .header("Authorization", format!("Bearer {}", token))
            .json(&json!({
                "title": title,
                "checkout_date": "2024-01-01"
            }))
            .send()
            .await
            .expect("Failed to checkout");
        assert_eq!(response.status(), 201);
    }
    let during = get_book(&client, book_id).await;
    assert_eq!(during["nb_available"], 0);

    let loans: Value = client
        .get(format!("{}/books/{}/loans", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to get loan history")
        .json()
        .await
        .expect("Failed to parse loan history");
    let loan_id = loans[0]["id"].as_i64().expect("No loan id");

    let response = client
        .post(format!("{}/loans/{}/terminate", BASE_URL, loan_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to terminate");
    assert!(response.status().is_success());

    // Terminating again must not restore a second copy; one is still out
    let response = client
        .post(format!("{}/loans/{}/terminate", BASE_URL, loan_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to terminate");
    assert_eq!(response.status(), 409);

    let after = get_book(&client, book_id).await;
    assert_eq!(after["nb_available"], 1);
}

#[tokio::test]
#[ignore]
async fn test_delete_loan_restores_only_open_loans() {
    let client = Client::new();
    let token = get_staff_token(&client).await;
    let (book_id, title) = create_test_book(&client, &token, 2).await;

    let checkout = |title: String| {
        let client = client.clone();
        let token = token.clone();
        async move {
            let response = client
                .post(format!("{}/loans", BASE_URL))
                .header("Authorization", format!("Bearer {}", token))
                .json(&json!({
                    "title": title,
                    "checkout_date": "2024-01-01"
                }))
                .send()
                .await
                .expect("Failed to checkout");
            assert_eq!(response.status(), 201);
            let loan: Value = response.json().await.expect("Failed to parse loan");
            loan["id"].as_i64().expect("No loan id")
        }
    };

    let open_loan = checkout(title.clone()).await;
    let closed_loan = checkout(title).await;
    assert_eq!(get_book(&client, book_id).await["nb_available"], 0);

    // Close the second loan; its copy goes back at termination
    let response = client
        .post(format!("{}/loans/{}/terminate", BASE_URL, closed_loan))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to terminate");
    assert!(response.status().is_success());
    assert_eq!(get_book(&client, book_id).await["nb_available"], 1);

    // Deleting the closed loan restores nothing
    let response = client
        .delete(format!("{}/loans/{}", BASE_URL, closed_loan))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to delete loan");
    assert_eq!(response.status(), 204);
    assert_eq!(get_book(&client, book_id).await["nb_available"], 1);

    // Deleting the open loan restores exactly one copy
    let response = client
        .delete(format!("{}/loans/{}", BASE_URL, open_loan))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to delete loan");
    assert_eq!(response.status(), 204);
    assert_eq!(get_book(&client, book_id).await["nb_available"], 2);
}

#[tokio::test]
#[ignore]
async fn test_checkout_out_of_stock() {
    let client = Client::new();
    let token = get_staff_token(&client).await;
    let (_book_id, title) = create_test_book(&client, &token, 1).await;

    let checkout = |title: String| {
        let client = client.clone();
        let token = token.clone();
        async move {
            client
                .post(format!("{}/loans", BASE_URL))
                .header("Authorization", format!("Bearer {}", token))
                .json(&json!({
                    "title": title,
                    "checkout_date": "2024-01-01"
                }))
                .send()
                .await
                .expect("Failed to checkout")
        }
    };

    let first = checkout(title.clone()).await;
    assert_eq!(first.status(), 201);

    // Last copy is out; the second checkout must be refused
    let second = checkout(title).await;
    assert_eq!(second.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_extend_only_once() {
    let client = Client::new();
    let token = get_staff_token(&client).await;
    let (_book_id, title) = create_test_book(&client, &token, 1).await;

    let response = client
        .post(format!("{}/loans", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": title,
            "checkout_date": "2024-01-01"
        }))
        .send()
        .await
        .expect("Failed to checkout");

    let loan: Value = response.json().await.expect("Failed to parse loan");
    let loan_id = loan["id"].as_i64().expect("No loan id");

    // First extension pushes the due date by 15 days
    let response = client
        .post(format!("{}/loans/{}/extend", BASE_URL, loan_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to extend");

    assert!(response.status().is_success());
    let extended: Value = response.json().await.expect("Failed to parse loan");
    assert_eq!(extended["due_date"], "2024-02-15");
    assert_eq!(extended["extended"], true);

    // Second extension is rejected and changes nothing
    let response = client
        .post(format!("{}/loans/{}/extend", BASE_URL, loan_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to extend");

    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_booking_lifecycle_counters() {
    let client = Client::new();
    let token = get_staff_token(&client).await;

    let name = format!("Integration Pottery {}", rand_suffix());
    let response = client
        .post(format!("{}/courses", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "name": name,
            "program": "Clay basics",
            "teacher": "Test Teacher",
            "weekday": "Monday",
            "nb_lessons": 10,
            "min_enrollment": 4,
            "capacity": 20,
            "price": "120.00",
            "membership_fee": "15.00"
        }))
        .send()
        .await
        .expect("Failed to create course");

    assert_eq!(response.status(), 201);
    let course: Value = response.json().await.expect("Failed to parse course");
    let course_id = course["id"].as_i64().expect("No course id");

    // Create moves pending 0 -> 1
    let response = client
        .post(format!("{}/bookings", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "course_id": course_id }))
        .send()
        .await
        .expect("Failed to create booking");

    assert_eq!(response.status(), 201);
    let booking: Value = response.json().await.expect("Failed to parse booking");
    let booking_id = booking["id"].as_i64().expect("No booking id");
    assert_eq!(booking["status"], "pending");

    // Confirm moves one unit from pending to confirmed
    let response = client
        .post(format!("{}/bookings/{}/confirm", BASE_URL, booking_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to confirm booking");

    assert!(response.status().is_success());

    let course: Value = client
        .get(format!("{}/courses/{}", BASE_URL, course_id))
        .send()
        .await
        .expect("Failed to get course")
        .json()
        .await
        .expect("Failed to parse course");
    assert_eq!(course["nb_pending"], 0);
    assert_eq!(course["nb_confirmed"], 1);

    // A confirmed booking cannot be rejected
    let response = client
        .post(format!("{}/bookings/{}/reject", BASE_URL, booking_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to reject booking");

    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_fill_rates() {
    let client = Client::new();
    let token = get_staff_token(&client).await;

    let response = client
        .get(format!("{}/courses/fill-rates", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body.is_array());
}

#[tokio::test]
#[ignore]
async fn test_stats_overview() {
    let client = Client::new();
    let token = get_staff_token(&client).await;

    let response = client
        .get(format!("{}/stats", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["catalog"]["nb_books"].is_number());
    assert!(body["loans"]["total"].is_number());
    assert!(body["courses"]["total_views"].is_number());
}
