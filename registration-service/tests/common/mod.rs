//! Test helper module for registration-service integration tests.
//!
//! Provides common setup utilities for PostgreSQL-based tests. Each test gets
//! its own schema for isolation. Tests are skipped when TEST_DATABASE_URL is
//! not set so the suite can run without a database.

#![allow(dead_code)]

use registration_service::config::{Config, DatabaseConfig, ServerConfig};
use registration_service::services::{init_metrics, Database};
use registration_service::startup::Application;
use secrecy::Secret;
use serde_json::json;
use std::sync::atomic::{AtomicU32, Ordering};
use uuid::Uuid;

// Counter for unique schema names
static SCHEMA_COUNTER: AtomicU32 = AtomicU32::new(0);

/// Get the database URL for testing, or None to skip database-backed tests.
pub fn get_test_database_url() -> Option<String> {
    std::env::var("TEST_DATABASE_URL").ok()
}

/// Generate a unique schema name for test isolation.
fn unique_schema_name() -> String {
    let counter = SCHEMA_COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("test_registration_{}_{}", std::process::id(), counter)
}

/// Test application wrapper for integration tests.
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub db: Database,
    schema_name: String,
}

impl TestApp {
    /// Spawn a new test application on a random port, or None when no test
    /// database is configured.
    pub async fn spawn() -> Option<Self> {
        let Some(base_url) = get_test_database_url() else {
            eprintln!("TEST_DATABASE_URL not set, skipping");
            return None;
        };

        // Initialize metrics (required for metrics endpoint test)
        init_metrics();

        let schema_name = unique_schema_name();

        // Create schema for test isolation
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(2)
            .connect(&base_url)
            .await
            .expect("Failed to connect to test database");

        sqlx::query(&format!("DROP SCHEMA IF EXISTS {} CASCADE", schema_name))
            .execute(&pool)
            .await
            .ok();
        sqlx::query(&format!("CREATE SCHEMA {}", schema_name))
            .execute(&pool)
            .await
            .expect("Failed to create test schema");

        pool.close().await;

        // Use ? or & depending on whether URL already has query parameters
        let separator = if base_url.contains('?') { "&" } else { "?" };
        let db_url_with_schema = format!(
            "{}{}options=-c search_path%3D{}",
            base_url, separator, schema_name
        );

        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Random port
            },
            database: DatabaseConfig {
                url: Secret::new(db_url_with_schema.clone()),
                max_connections: 5,
                min_connections: 1,
            },
            service_name: "registration-service-test".to_string(),
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let db = Database::new(&db_url_with_schema, 5, 1)
            .await
            .expect("Failed to create test database");

        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to be ready by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("http://127.0.0.1:{}/health", port);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        Some(TestApp {
            address,
            port,
            db,
            schema_name,
        })
    }

    /// POST a registration and return its id.
    pub async fn create_registration(
        &self,
        client: &reqwest::Client,
        full_name: &str,
        email: &str,
        company: &str,
    ) -> Uuid {
        let response = client
            .post(format!("{}/api/registrations", self.address))
            .json(&json!({
                "fullName": full_name,
                "email": email,
                "company": company,
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status().as_u16(), 201);

        let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
        Uuid::parse_str(body["id"].as_str().unwrap()).unwrap()
    }

    /// POST an invoice with a single line item and return the response body.
    pub async fn create_invoice(
        &self,
        client: &reqwest::Client,
        registration_id: Uuid,
        quantity: i32,
        price: &str,
    ) -> serde_json::Value {
        let response = client
            .post(format!("{}/api/invoices", self.address))
            .json(&json!({
                "registrationId": registration_id,
                "dueDate": "2024-06-30",
                "items": [
                    { "description": "VAT registration", "quantity": quantity, "price": price }
                ],
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status().as_u16(), 201);

        response.json().await.expect("Failed to parse JSON")
    }

    /// Cleanup test resources (schema).
    pub async fn cleanup(&self) {
        let Some(base_url) = get_test_database_url() else {
            return;
        };

        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(1)
            .connect(&base_url)
            .await
            .ok();

        if let Some(pool) = pool {
            let _ = sqlx::query(&format!(
                "DROP SCHEMA IF EXISTS {} CASCADE",
                self.schema_name
            ))
            .execute(&pool)
            .await;
            pool.close().await;
        }
    }
}
