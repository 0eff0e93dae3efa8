//! Registration model for registration-service.

use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Registration approval status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegistrationStatus {
    Pending,
    Approved,
    Rejected,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Pending => "PENDING",
            RegistrationStatus::Approved => "APPROVED",
            RegistrationStatus::Rejected => "REJECTED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(RegistrationStatus::Pending),
            "APPROVED" => Some(RegistrationStatus::Approved),
            "REJECTED" => Some(RegistrationStatus::Rejected),
            _ => None,
        }
    }

    /// Transition hook. Any status is currently reachable from any other;
    /// stricter rules (e.g. forbidding REJECTED -> APPROVED) plug in here
    /// without touching call sites.
    pub fn can_transition_to(&self, _next: RegistrationStatus) -> bool {
        true
    }
}

/// Registration row.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    #[serde(rename = "id")]
    pub registration_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub company: String,
    pub status: String,
    #[serde(rename = "createdAt")]
    pub created_utc: DateTime<Utc>,
}

/// Registration row joined with its invoice count, as returned by list
/// queries. The count serializes as `_count.invoices` to match the wire
/// contract consumed by the UI.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationWithCount {
    #[serde(rename = "id")]
    pub registration_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub company: String,
    pub status: String,
    #[serde(rename = "createdAt")]
    pub created_utc: DateTime<Utc>,
    #[serde(rename = "_count", serialize_with = "as_invoice_count")]
    pub invoice_count: i64,
}

fn as_invoice_count<S: Serializer>(count: &i64, serializer: S) -> Result<S::Ok, S::Error> {
    let mut s = serializer.serialize_struct("InvoiceCount", 1)?;
    s.serialize_field("invoices", count)?;
    s.end()
}

/// Minimal projection used to populate selection lists.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationBrief {
    #[serde(rename = "id")]
    pub registration_id: Uuid,
    pub full_name: String,
    pub company: String,
}

/// Applicant submission. Status is never taken from the client; new
/// registrations are always created PENDING.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRegistrationRequest {
    #[validate(length(min = 3, message = "fullName must be at least 3 characters"))]
    pub full_name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 1, message = "company must not be empty"))]
    pub company: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}
