//! Seed the database with demo data.
//!
//! Clears all tables, then inserts a handful of registrations and invoices
//! for local development. Run with `cargo run --bin seed`.

use chrono::{NaiveDate, TimeZone, Utc};
use dotenvy::dotenv;
use registration_service::config::Config;
use registration_service::services::{init_metrics, Database};
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use service_core::observability::logging::init_tracing;
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;
    init_tracing("registration-service-seed", "info");
    init_metrics();

    let db = Database::new(
        config.database.url.expose_secret(),
        config.database.max_connections,
        config.database.min_connections,
    )
    .await
    .map_err(|e| anyhow::anyhow!("{e}"))?;
    db.run_migrations().await.map_err(|e| anyhow::anyhow!("{e}"))?;

    let pool = db.pool();

    tracing::info!("Clearing existing data");
    sqlx::query("DELETE FROM invoice_items").execute(pool).await?;
    sqlx::query("DELETE FROM invoices").execute(pool).await?;
    sqlx::query("DELETE FROM registrations").execute(pool).await?;

    tracing::info!("Seeding data");

    let alice = insert_registration(
        pool,
        "Alice Johnson",
        "alice@techcorp.com",
        "TechCorp Solutions",
        "PENDING",
        Utc.with_ymd_and_hms(2023, 10, 25, 0, 0, 0).unwrap(),
    )
    .await?;

    let bob = insert_registration(
        pool,
        "Bob Smith",
        "bob@innovate.io",
        "Innovate IO",
        "APPROVED",
        Utc.with_ymd_and_hms(2023, 10, 24, 0, 0, 0).unwrap(),
    )
    .await?;

    insert_registration(
        pool,
        "Charlie Brown",
        "charlie@design.co",
        "Design Co",
        "REJECTED",
        Utc.with_ymd_and_hms(2023, 10, 23, 0, 0, 0).unwrap(),
    )
    .await?;

    let paid = insert_invoice(
        pool,
        "INV-2023-1001",
        bob,
        NaiveDate::from_ymd_opt(2023, 11, 1).unwrap(),
        "PAID",
        Some("Thank you for your business."),
        Utc.with_ymd_and_hms(2023, 10, 24, 0, 0, 0).unwrap(),
    )
    .await?;
    insert_item(pool, paid, 0, "VAT Registration Service Fee", 1, Decimal::new(25000, 2)).await?;
    insert_item(pool, paid, 1, "Expedited Processing", 1, Decimal::new(5000, 2)).await?;

    let unpaid = insert_invoice(
        pool,
        "INV-2023-1002",
        alice,
        NaiveDate::from_ymd_opt(2023, 11, 5).unwrap(),
        "UNPAID",
        Some("Please pay within 14 days."),
        Utc.with_ymd_and_hms(2023, 10, 25, 0, 0, 0).unwrap(),
    )
    .await?;
    insert_item(pool, unpaid, 0, "Standard VAT Registration", 1, Decimal::new(25000, 2)).await?;

    tracing::info!("Seeding completed");

    Ok(())
}

async fn insert_registration(
    pool: &sqlx::PgPool,
    full_name: &str,
    email: &str,
    company: &str,
    status: &str,
    created_utc: chrono::DateTime<Utc>,
) -> anyhow::Result<Uuid> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO registrations (registration_id, full_name, email, company, status, created_utc)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(id)
    .bind(full_name)
    .bind(email)
    .bind(company)
    .bind(status)
    .bind(created_utc)
    .execute(pool)
    .await?;
    Ok(id)
}

async fn insert_invoice(
    pool: &sqlx::PgPool,
    invoice_number: &str,
    registration_id: Uuid,
    due_date: NaiveDate,
    status: &str,
    notes: Option<&str>,
    created_utc: chrono::DateTime<Utc>,
) -> anyhow::Result<Uuid> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO invoices (invoice_id, invoice_number, registration_id, due_date, status,
                              vat_rate, notes, created_utc)
        VALUES ($1, $2, $3, $4, $5, 0.20, $6, $7)
        "#,
    )
    .bind(id)
    .bind(invoice_number)
    .bind(registration_id)
    .bind(due_date)
    .bind(status)
    .bind(notes)
    .bind(created_utc)
    .execute(pool)
    .await?;
    Ok(id)
}

async fn insert_item(
    pool: &sqlx::PgPool,
    invoice_id: Uuid,
    sort_order: i32,
    description: &str,
    quantity: i32,
    price: Decimal,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO invoice_items (item_id, invoice_id, description, quantity, price, sort_order)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(invoice_id)
    .bind(description)
    .bind(quantity)
    .bind(price)
    .bind(sort_order)
    .execute(pool)
    .await?;
    Ok(())
}
