//! Registration workflow integration tests for registration-service.

mod common;

use common::TestApp;
use reqwest::Client;
use serde_json::json;

#[tokio::test]
async fn create_registration_starts_pending() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    let client = Client::new();

    let response = client
        .post(format!("{}/api/registrations", app.address))
        .json(&json!({
            "fullName": "Alice Johnson",
            "email": "alice@techcorp.com",
            "company": "TechCorp Solutions",
            // Clients cannot pick their own status at creation
            "status": "APPROVED",
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 201);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["fullName"], "Alice Johnson");
    assert_eq!(body["email"], "alice@techcorp.com");
    assert_eq!(body["company"], "TechCorp Solutions");
    assert_eq!(body["status"], "PENDING");
    assert!(body["id"].as_str().is_some());
    assert!(body["createdAt"].as_str().is_some());

    app.cleanup().await;
}

#[tokio::test]
async fn create_registration_rejects_invalid_input() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    let client = Client::new();

    // Name too short
    let response = client
        .post(format!("{}/api/registrations", app.address))
        .json(&json!({
            "fullName": "Al",
            "email": "alice@techcorp.com",
            "company": "TechCorp",
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 400);

    // Malformed email
    let response = client
        .post(format!("{}/api/registrations", app.address))
        .json(&json!({
            "fullName": "Alice Johnson",
            "email": "not-an-email",
            "company": "TechCorp",
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 400);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert!(body["error"].as_str().is_some());

    // Empty company
    let response = client
        .post(format!("{}/api/registrations", app.address))
        .json(&json!({
            "fullName": "Alice Johnson",
            "email": "alice@techcorp.com",
            "company": "",
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 400);

    app.cleanup().await;
}

#[tokio::test]
async fn list_registrations_paginates_and_counts_invoices() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    let client = Client::new();

    let first = app
        .create_registration(&client, "Alice Johnson", "alice@techcorp.com", "TechCorp")
        .await;
    for i in 0..2 {
        app.create_registration(
            &client,
            &format!("Extra Person {}", i),
            &format!("extra{}@example.com", i),
            "Extra Co",
        )
        .await;
    }
    app.create_invoice(&client, first, 1, "100").await;

    let response = client
        .get(format!("{}/api/registrations?page=1&limit=2", app.address))
        .send()
        .await
        .expect("Failed to execute request");
    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["meta"]["total"], 3);
    assert_eq!(body["meta"]["page"], 1);
    assert_eq!(body["meta"]["limit"], 2);
    assert_eq!(body["meta"]["totalPages"], 2);

    // A page past the end is empty, not an error
    let response = client
        .get(format!("{}/api/registrations?page=9&limit=2", app.address))
        .send()
        .await
        .expect("Failed to execute request");
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
    assert_eq!(body["meta"]["total"], 3);

    // The invoice count rides along under _count
    let response = client
        .get(format!(
            "{}/api/registrations?search=alice&limit=10",
            app.address
        ))
        .send()
        .await
        .expect("Failed to execute request");
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["fullName"], "Alice Johnson");
    assert_eq!(data[0]["_count"]["invoices"], 1);

    app.cleanup().await;
}

#[tokio::test]
async fn search_matches_name_company_and_email() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    let client = Client::new();

    app.create_registration(&client, "Alice Johnson", "alice@techcorp.com", "TechCorp")
        .await;
    app.create_registration(&client, "Bob Smith", "bob@innovate.io", "Innovate IO")
        .await;

    // Matching is substring, with case sensitivity following the storage
    // collation (case-sensitive on stock Postgres).
    for (term, expected) in [
        ("Johnson", 1),
        ("JOHNSON", 0),
        ("innovate", 1),
        ("techcorp.com", 1),
        ("o", 2),
    ] {
        let response = client
            .get(format!("{}/api/registrations?search={}", app.address, term))
            .send()
            .await
            .expect("Failed to execute request");
        let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
        assert_eq!(
            body["data"].as_array().unwrap().len(),
            expected,
            "search term {:?}",
            term
        );
    }

    app.cleanup().await;
}

#[tokio::test]
async fn list_all_returns_briefs_ordered_by_company() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    let client = Client::new();

    app.create_registration(&client, "Bob Smith", "bob@innovate.io", "Zenith Ltd")
        .await;
    app.create_registration(&client, "Alice Johnson", "alice@techcorp.com", "Acme Inc")
        .await;

    let response = client
        .get(format!("{}/api/registrations/all", app.address))
        .send()
        .await
        .expect("Failed to execute request");
    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    let data = body.as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["company"], "Acme Inc");
    assert_eq!(data[1]["company"], "Zenith Ltd");

    app.cleanup().await;
}

#[tokio::test]
async fn update_status_transitions_registration() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    let client = Client::new();

    let id = app
        .create_registration(&client, "Alice Johnson", "alice@techcorp.com", "TechCorp")
        .await;

    let response = client
        .patch(format!("{}/api/registrations/{}/status", app.address, id))
        .json(&json!({ "status": "APPROVED" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "APPROVED");

    // Unknown status value
    let response = client
        .patch(format!("{}/api/registrations/{}/status", app.address, id))
        .json(&json!({ "status": "SHIPPED" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 400);

    // Unknown registration
    let response = client
        .patch(format!(
            "{}/api/registrations/{}/status",
            app.address,
            uuid::Uuid::new_v4()
        ))
        .json(&json!({ "status": "APPROVED" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 404);

    app.cleanup().await;
}

#[tokio::test]
async fn delete_registration_cascades_to_invoices() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    let client = Client::new();

    let id = app
        .create_registration(&client, "Alice Johnson", "alice@techcorp.com", "TechCorp")
        .await;
    app.create_invoice(&client, id, 2, "100").await;

    let response = client
        .delete(format!("{}/api/registrations/{}", app.address, id))
        .send()
        .await
        .expect("Failed to execute request");
    assert!(response.status().is_success());

    // No orphaned invoices or items remain
    let invoices: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoices")
        .fetch_one(app.db.pool())
        .await
        .unwrap();
    assert_eq!(invoices, 0);
    let items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoice_items")
        .fetch_one(app.db.pool())
        .await
        .unwrap();
    assert_eq!(items, 0);

    // Deleting again is a 404
    let response = client
        .delete(format!("{}/api/registrations/{}", app.address, id))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 404);

    app.cleanup().await;
}
