//! Dashboard aggregation models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// Back-office dashboard snapshot. Computed fresh on every call, nothing is
/// persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_registrations: i64,
    pub pending_registrations: i64,
    pub approved_registrations: i64,
    pub rejected_registrations: i64,
    /// Gross revenue across all invoices, VAT included, rounded to 2 dp at
    /// this display boundary only.
    pub total_revenue: Decimal,
    pub recent_activity: Vec<RecentRegistration>,
    pub status_distribution: Vec<StatusBucket>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RecentRegistration {
    #[serde(rename = "name")]
    pub full_name: String,
    pub status: String,
    #[serde(rename = "date")]
    pub created_utc: DateTime<Utc>,
}

/// One slice of the status chart.
#[derive(Debug, Clone, Serialize)]
pub struct StatusBucket {
    pub name: &'static str,
    pub value: i64,
    pub color: &'static str,
}
