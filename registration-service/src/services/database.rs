//! Database service for registration-service.
//!
//! Thin per-entity data access over PostgreSQL. Every multi-step mutation
//! (cascading registration delete, invoice create with numbering, wholesale
//! item replacement) runs in a single transaction; partial application is a
//! correctness violation.

use crate::models::{
    CreateRegistrationRequest, Invoice, InvoiceItem, InvoiceItemRequest, InvoiceWithItems, Page,
    RecentRegistration, Registration, RegistrationBrief, RegistrationWithCount,
};
use crate::services::metrics::DB_QUERY_DURATION;
use crate::services::numbering;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use service_core::error::AppError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Attempts for the read-generate-insert invoice transaction before giving
/// up on unique-violation conflicts.
const NUMBERING_RETRIES: u32 = 3;

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool.
    #[instrument(skip(database_url), fields(service = "registration-service"))]
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, AppError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    /// Wrap an existing pool (used by tests with schema-scoped pools).
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check database health.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;
        Ok(())
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Registration Operations
    // -------------------------------------------------------------------------

    /// Count registrations, optionally filtered by a search term.
    #[instrument(skip(self, search))]
    pub async fn count_registrations(&self, search: Option<&str>) -> Result<i64, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["count_registrations"])
            .start_timer();

        let pattern = search.map(like_pattern);
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM registrations
            WHERE ($1::text IS NULL
                   OR full_name LIKE $1
                   OR company LIKE $1
                   OR email LIKE $1)
            "#,
        )
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to count registrations: {}", e))
        })?;

        timer.observe_duration();

        Ok(total)
    }

    /// Count registrations in a given status.
    #[instrument(skip(self))]
    pub async fn count_registrations_by_status(&self, status: &str) -> Result<i64, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["count_registrations_by_status"])
            .start_timer();

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM registrations WHERE status = $1")
                .bind(status)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::DatabaseError(anyhow::anyhow!(
                        "Failed to count registrations by status: {}",
                        e
                    ))
                })?;

        timer.observe_duration();

        Ok(total)
    }

    /// List a page of registrations with their invoice counts, most recent
    /// first, optionally filtered by a substring search over name, company
    /// and email.
    #[instrument(skip(self, search))]
    pub async fn list_registrations(
        &self,
        search: Option<&str>,
        page: Page,
    ) -> Result<Vec<RegistrationWithCount>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_registrations"])
            .start_timer();

        let pattern = search.map(like_pattern);
        let registrations = sqlx::query_as::<_, RegistrationWithCount>(
            r#"
            SELECT r.registration_id, r.full_name, r.email, r.company, r.status, r.created_utc,
                   COUNT(i.invoice_id) AS invoice_count
            FROM registrations r
            LEFT JOIN invoices i ON i.registration_id = r.registration_id
            WHERE ($1::text IS NULL
                   OR r.full_name LIKE $1
                   OR r.company LIKE $1
                   OR r.email LIKE $1)
            GROUP BY r.registration_id
            ORDER BY r.created_utc DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(&pattern)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to list registrations: {}", e))
        })?;

        timer.observe_duration();

        Ok(registrations)
    }

    /// Every registration as an id/name/company brief, ordered by company.
    #[instrument(skip(self))]
    pub async fn list_registration_briefs(&self) -> Result<Vec<RegistrationBrief>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_registration_briefs"])
            .start_timer();

        let briefs = sqlx::query_as::<_, RegistrationBrief>(
            r#"
            SELECT registration_id, full_name, company
            FROM registrations
            ORDER BY company ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to list registration briefs: {}", e))
        })?;

        timer.observe_duration();

        Ok(briefs)
    }

    /// Get a registration by ID.
    #[instrument(skip(self), fields(registration_id = %registration_id))]
    pub async fn get_registration(
        &self,
        registration_id: Uuid,
    ) -> Result<Option<Registration>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_registration"])
            .start_timer();

        let registration = sqlx::query_as::<_, Registration>(
            r#"
            SELECT registration_id, full_name, email, company, status, created_utc
            FROM registrations
            WHERE registration_id = $1
            "#,
        )
        .bind(registration_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to get registration: {}", e))
        })?;

        timer.observe_duration();

        Ok(registration)
    }

    /// Create a registration. Status is always PENDING at creation.
    #[instrument(skip(self, input))]
    pub async fn create_registration(
        &self,
        input: &CreateRegistrationRequest,
    ) -> Result<Registration, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_registration"])
            .start_timer();

        let registration_id = Uuid::new_v4();
        let registration = sqlx::query_as::<_, Registration>(
            r#"
            INSERT INTO registrations (registration_id, full_name, email, company, status)
            VALUES ($1, $2, $3, $4, 'PENDING')
            RETURNING registration_id, full_name, email, company, status, created_utc
            "#,
        )
        .bind(registration_id)
        .bind(&input.full_name)
        .bind(&input.email)
        .bind(&input.company)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to create registration: {}", e))
        })?;

        timer.observe_duration();

        info!(registration_id = %registration.registration_id, "Registration created");

        Ok(registration)
    }

    /// Set a registration's status.
    #[instrument(skip(self), fields(registration_id = %registration_id))]
    pub async fn update_registration_status(
        &self,
        registration_id: Uuid,
        status: &str,
    ) -> Result<Option<Registration>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_registration_status"])
            .start_timer();

        let registration = sqlx::query_as::<_, Registration>(
            r#"
            UPDATE registrations
            SET status = $2
            WHERE registration_id = $1
            RETURNING registration_id, full_name, email, company, status, created_utc
            "#,
        )
        .bind(registration_id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to update registration: {}", e))
        })?;

        timer.observe_duration();

        if let Some(ref reg) = registration {
            info!(registration_id = %reg.registration_id, status = %reg.status, "Registration status updated");
        }

        Ok(registration)
    }

    /// Delete a registration together with every invoice (and item)
    /// referencing it, in one transaction.
    #[instrument(skip(self), fields(registration_id = %registration_id))]
    pub async fn delete_registration_cascade(
        &self,
        registration_id: Uuid,
    ) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["delete_registration_cascade"])
            .start_timer();

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        sqlx::query(
            r#"
            DELETE FROM invoice_items
            WHERE invoice_id IN (SELECT invoice_id FROM invoices WHERE registration_id = $1)
            "#,
        )
        .bind(registration_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to delete invoice items: {}", e))
        })?;

        sqlx::query("DELETE FROM invoices WHERE registration_id = $1")
            .bind(registration_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to delete invoices: {}", e))
            })?;

        let result = sqlx::query("DELETE FROM registrations WHERE registration_id = $1")
            .bind(registration_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to delete registration: {}", e))
            })?;

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })?;

        timer.observe_duration();

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!(registration_id = %registration_id, "Registration deleted with invoice cascade");
        }

        Ok(deleted)
    }

    /// Most recently created registrations, for the dashboard feed.
    #[instrument(skip(self))]
    pub async fn recent_registrations(
        &self,
        take: i64,
    ) -> Result<Vec<RecentRegistration>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["recent_registrations"])
            .start_timer();

        let recent = sqlx::query_as::<_, RecentRegistration>(
            r#"
            SELECT full_name, status, created_utc
            FROM registrations
            ORDER BY created_utc DESC
            LIMIT $1
            "#,
        )
        .bind(take)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to list recent registrations: {}", e))
        })?;

        timer.observe_duration();

        Ok(recent)
    }

    // -------------------------------------------------------------------------
    // Invoice Operations
    // -------------------------------------------------------------------------

    /// Count all invoices.
    #[instrument(skip(self))]
    pub async fn count_invoices(&self) -> Result<i64, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["count_invoices"])
            .start_timer();

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoices")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to count invoices: {}", e))
            })?;

        timer.observe_duration();

        Ok(total)
    }

    /// List a page of invoices, most recent first.
    #[instrument(skip(self))]
    pub async fn list_invoices(&self, page: Page) -> Result<Vec<Invoice>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_invoices"])
            .start_timer();

        let invoices = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT invoice_id, invoice_number, registration_id, due_date, status,
                   vat_rate, notes, created_utc
            FROM invoices
            ORDER BY created_utc DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list invoices: {}", e)))?;

        timer.observe_duration();

        Ok(invoices)
    }

    /// Every invoice, for the dashboard revenue scan.
    #[instrument(skip(self))]
    pub async fn list_all_invoices(&self) -> Result<Vec<Invoice>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_all_invoices"])
            .start_timer();

        let invoices = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT invoice_id, invoice_number, registration_id, due_date, status,
                   vat_rate, notes, created_utc
            FROM invoices
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list invoices: {}", e)))?;

        timer.observe_duration();

        Ok(invoices)
    }

    /// Get an invoice by ID.
    #[instrument(skip(self), fields(invoice_id = %invoice_id))]
    pub async fn get_invoice(&self, invoice_id: Uuid) -> Result<Option<Invoice>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_invoice"])
            .start_timer();

        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT invoice_id, invoice_number, registration_id, due_date, status,
                   vat_rate, notes, created_utc
            FROM invoices
            WHERE invoice_id = $1
            "#,
        )
        .bind(invoice_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get invoice: {}", e)))?;

        timer.observe_duration();

        Ok(invoice)
    }

    /// Items for one invoice, in insertion order.
    #[instrument(skip(self), fields(invoice_id = %invoice_id))]
    pub async fn get_invoice_items(&self, invoice_id: Uuid) -> Result<Vec<InvoiceItem>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_invoice_items"])
            .start_timer();

        let items = sqlx::query_as::<_, InvoiceItem>(
            r#"
            SELECT item_id, invoice_id, description, quantity, price
            FROM invoice_items
            WHERE invoice_id = $1
            ORDER BY sort_order
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to get invoice items: {}", e))
        })?;

        timer.observe_duration();

        Ok(items)
    }

    /// Items for a set of invoices, in insertion order per invoice.
    #[instrument(skip(self, invoice_ids))]
    pub async fn list_items_for_invoices(
        &self,
        invoice_ids: &[Uuid],
    ) -> Result<Vec<InvoiceItem>, AppError> {
        if invoice_ids.is_empty() {
            return Ok(Vec::new());
        }

        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_items_for_invoices"])
            .start_timer();

        let items = sqlx::query_as::<_, InvoiceItem>(
            r#"
            SELECT item_id, invoice_id, description, quantity, price
            FROM invoice_items
            WHERE invoice_id = ANY($1)
            ORDER BY invoice_id, sort_order
            "#,
        )
        .bind(invoice_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to list invoice items: {}", e))
        })?;

        timer.observe_duration();

        Ok(items)
    }

    /// Create an invoice with its items and a freshly derived invoice number,
    /// atomically.
    ///
    /// The number comes from the most recently created invoice (prefix
    /// `INV-`, created_utc descending). Generation and insert share one
    /// transaction; the UNIQUE constraint on invoice_number catches
    /// concurrent writers and the whole transaction is retried a bounded
    /// number of times on conflict.
    #[instrument(skip(self, items), fields(registration_id = %registration_id))]
    pub async fn create_invoice_with_items(
        &self,
        registration_id: Uuid,
        due_date: NaiveDate,
        status: &str,
        vat_rate: Decimal,
        notes: Option<&str>,
        items: &[InvoiceItemRequest],
    ) -> Result<InvoiceWithItems, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_invoice_with_items"])
            .start_timer();

        let mut attempt = 0;
        let invoice = loop {
            attempt += 1;

            let mut tx = self.pool.begin().await.map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
            })?;

            let last: Option<String> = sqlx::query_scalar(
                r#"
                SELECT invoice_number
                FROM invoices
                WHERE invoice_number LIKE 'INV-%'
                ORDER BY created_utc DESC
                LIMIT 1
                "#,
            )
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to read last invoice: {}", e))
            })?;

            let invoice_number =
                numbering::next_invoice_number(due_date.year(), last.as_deref())?;

            let invoice_id = Uuid::new_v4();
            let inserted = sqlx::query_as::<_, Invoice>(
                r#"
                INSERT INTO invoices (invoice_id, invoice_number, registration_id, due_date,
                                      status, vat_rate, notes)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING invoice_id, invoice_number, registration_id, due_date, status,
                          vat_rate, notes, created_utc
                "#,
            )
            .bind(invoice_id)
            .bind(&invoice_number)
            .bind(registration_id)
            .bind(due_date)
            .bind(status)
            .bind(vat_rate)
            .bind(notes)
            .fetch_one(&mut *tx)
            .await;

            match inserted {
                Ok(invoice) => {
                    let items = insert_items(&mut tx, invoice.invoice_id, items).await?;
                    tx.commit().await.map_err(|e| {
                        AppError::DatabaseError(anyhow::anyhow!(
                            "Failed to commit transaction: {}",
                            e
                        ))
                    })?;
                    break InvoiceWithItems { invoice, items };
                }
                Err(sqlx::Error::Database(db_err))
                    if db_err.is_unique_violation() && attempt < NUMBERING_RETRIES =>
                {
                    warn!(
                        invoice_number = %invoice_number,
                        attempt = attempt,
                        "Invoice number conflict, retrying"
                    );
                    continue;
                }
                Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                    return Err(AppError::Conflict(anyhow::anyhow!(
                        "Invoice number conflict persisted after {} attempts",
                        attempt
                    )));
                }
                Err(e) => {
                    return Err(AppError::DatabaseError(anyhow::anyhow!(
                        "Failed to create invoice: {}",
                        e
                    )));
                }
            }
        };

        timer.observe_duration();

        info!(
            invoice_id = %invoice.invoice.invoice_id,
            invoice_number = %invoice.invoice.invoice_number,
            "Invoice created"
        );

        Ok(invoice)
    }

    /// Patch an invoice's status/notes and, when a new item set is supplied,
    /// replace the items wholesale. Both happen in one transaction.
    #[instrument(skip(self, items), fields(invoice_id = %invoice_id))]
    pub async fn update_invoice_with_items(
        &self,
        invoice_id: Uuid,
        status: Option<&str>,
        notes: Option<&str>,
        items: Option<&[InvoiceItemRequest]>,
    ) -> Result<Option<InvoiceWithItems>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_invoice_with_items"])
            .start_timer();

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            UPDATE invoices
            SET status = COALESCE($2, status),
                notes = COALESCE($3, notes)
            WHERE invoice_id = $1
            RETURNING invoice_id, invoice_number, registration_id, due_date, status,
                      vat_rate, notes, created_utc
            "#,
        )
        .bind(invoice_id)
        .bind(status)
        .bind(notes)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update invoice: {}", e)))?;

        let Some(invoice) = invoice else {
            return Ok(None);
        };

        let items = match items {
            Some(new_items) => {
                sqlx::query("DELETE FROM invoice_items WHERE invoice_id = $1")
                    .bind(invoice_id)
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| {
                        AppError::DatabaseError(anyhow::anyhow!(
                            "Failed to delete invoice items: {}",
                            e
                        ))
                    })?;
                insert_items(&mut tx, invoice_id, new_items).await?
            }
            None => {
                sqlx::query_as::<_, InvoiceItem>(
                    r#"
                    SELECT item_id, invoice_id, description, quantity, price
                    FROM invoice_items
                    WHERE invoice_id = $1
                    ORDER BY sort_order
                    "#,
                )
                .bind(invoice_id)
                .fetch_all(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::DatabaseError(anyhow::anyhow!("Failed to get invoice items: {}", e))
                })?
            }
        };

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })?;

        timer.observe_duration();

        info!(invoice_id = %invoice.invoice_id, "Invoice updated");

        Ok(Some(InvoiceWithItems { invoice, items }))
    }

    /// Delete an invoice and its items in one transaction.
    #[instrument(skip(self), fields(invoice_id = %invoice_id))]
    pub async fn delete_invoice(&self, invoice_id: Uuid) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["delete_invoice"])
            .start_timer();

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        sqlx::query("DELETE FROM invoice_items WHERE invoice_id = $1")
            .bind(invoice_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to delete invoice items: {}", e))
            })?;

        let result = sqlx::query("DELETE FROM invoices WHERE invoice_id = $1")
            .bind(invoice_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to delete invoice: {}", e))
            })?;

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })?;

        timer.observe_duration();

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!(invoice_id = %invoice_id, "Invoice deleted");
        }

        Ok(deleted)
    }
}

/// Insert an item set for an invoice inside an open transaction, preserving
/// submission order.
async fn insert_items(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    invoice_id: Uuid,
    items: &[InvoiceItemRequest],
) -> Result<Vec<InvoiceItem>, AppError> {
    let mut inserted = Vec::with_capacity(items.len());
    for (sort_order, item) in items.iter().enumerate() {
        let row = sqlx::query_as::<_, InvoiceItem>(
            r#"
            INSERT INTO invoice_items (item_id, invoice_id, description, quantity, price, sort_order)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING item_id, invoice_id, description, quantity, price
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(invoice_id)
        .bind(&item.description)
        .bind(item.quantity)
        .bind(item.price)
        .bind(sort_order as i32)
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to insert invoice item: {}", e))
        })?;
        inserted.push(row);
    }
    Ok(inserted)
}

/// Build a `%term%` pattern with LIKE metacharacters escaped.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}
