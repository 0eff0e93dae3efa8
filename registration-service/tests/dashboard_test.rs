//! Dashboard aggregation integration tests for registration-service.

mod common;

use common::TestApp;
use reqwest::Client;
use serde_json::json;

#[tokio::test]
async fn dashboard_stats_aggregate_counts_and_revenue() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    let client = Client::new();

    let alice = app
        .create_registration(&client, "Alice Johnson", "alice@techcorp.com", "TechCorp")
        .await;
    let bob = app
        .create_registration(&client, "Bob Smith", "bob@innovate.io", "Innovate IO")
        .await;
    app.create_registration(&client, "Charlie Brown", "charlie@design.co", "Design Co")
        .await;

    client
        .patch(format!("{}/api/registrations/{}/status", app.address, bob))
        .json(&json!({ "status": "APPROVED" }))
        .send()
        .await
        .expect("Failed to execute request");

    // Two units at 100 with the default 20% VAT rate: 200 net, 40 VAT
    app.create_invoice(&client, alice, 2, "100").await;

    let response = client
        .get(format!("{}/api/dashboard/stats", app.address))
        .send()
        .await
        .expect("Failed to execute request");
    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["success"], true);

    let data = &body["data"];
    assert_eq!(data["totalRegistrations"], 3);
    assert_eq!(data["pendingRegistrations"], 2);
    assert_eq!(data["approvedRegistrations"], 1);
    assert_eq!(data["rejectedRegistrations"], 0);
    assert_eq!(data["totalRevenue"], "240.00");

    let recent = data["recentActivity"].as_array().unwrap();
    assert_eq!(recent.len(), 3);
    assert!(recent[0]["name"].as_str().is_some());
    assert!(recent[0]["date"].as_str().is_some());

    let distribution = data["statusDistribution"].as_array().unwrap();
    assert_eq!(distribution.len(), 3);
    assert_eq!(distribution[0]["name"], "Pending");
    assert_eq!(distribution[0]["value"], 2);
    assert_eq!(distribution[1]["name"], "Approved");
    assert_eq!(distribution[1]["value"], 1);
    assert_eq!(distribution[2]["name"], "Rejected");
    assert_eq!(distribution[2]["value"], 0);

    app.cleanup().await;
}

#[tokio::test]
async fn dashboard_stats_empty_database() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    let client = Client::new();

    let response = client
        .get(format!("{}/api/dashboard/stats", app.address))
        .send()
        .await
        .expect("Failed to execute request");
    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    let data = &body["data"];
    assert_eq!(data["totalRegistrations"], 0);
    assert_eq!(data["totalRevenue"], "0.00");
    assert_eq!(data["recentActivity"].as_array().unwrap().len(), 0);

    app.cleanup().await;
}
