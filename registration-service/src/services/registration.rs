//! Registration lifecycle service.

use service_core::error::AppError;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    CreateRegistrationRequest, Page, PaginatedResponse, PaginationMeta, Registration,
    RegistrationBrief, RegistrationStatus, RegistrationWithCount,
};
use crate::services::metrics::REGISTRATIONS_TOTAL;
use crate::services::Database;

#[derive(Clone)]
pub struct RegistrationService {
    db: Database,
}

impl RegistrationService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Page of registrations, newest first, with invoice counts. `search`
    /// does a substring match over fullName, company and email.
    #[instrument(skip(self, search))]
    pub async fn list(
        &self,
        page: Page,
        search: Option<&str>,
    ) -> Result<PaginatedResponse<RegistrationWithCount>, AppError> {
        let total = self.db.count_registrations(search).await?;
        let data = self.db.list_registrations(search, page).await?;

        Ok(PaginatedResponse {
            data,
            meta: PaginationMeta::new(page, total),
        })
    }

    /// Unpaginated id/name/company briefs for selection lists, company
    /// ascending.
    #[instrument(skip(self))]
    pub async fn list_all_brief(&self) -> Result<Vec<RegistrationBrief>, AppError> {
        self.db.list_registration_briefs().await
    }

    /// Register an applicant. Whatever the client claims, new registrations
    /// start PENDING.
    #[instrument(skip(self, input))]
    pub async fn create(
        &self,
        input: CreateRegistrationRequest,
    ) -> Result<Registration, AppError> {
        input.validate()?;

        let registration = self.db.create_registration(&input).await?;
        REGISTRATIONS_TOTAL
            .with_label_values(&[RegistrationStatus::Pending.as_str()])
            .inc();

        Ok(registration)
    }

    /// Move a registration to a new status.
    #[instrument(skip(self), fields(registration_id = %registration_id))]
    pub async fn set_status(
        &self,
        registration_id: Uuid,
        status: &str,
    ) -> Result<Registration, AppError> {
        let next = RegistrationStatus::parse(status).ok_or_else(|| {
            AppError::BadRequest(anyhow::anyhow!("Invalid registration status: {}", status))
        })?;

        let existing = self
            .db
            .get_registration(registration_id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Registration not found")))?;

        if let Some(current) = RegistrationStatus::parse(&existing.status) {
            if !current.can_transition_to(next) {
                return Err(AppError::BadRequest(anyhow::anyhow!(
                    "Transition {} -> {} is not allowed",
                    existing.status,
                    status
                )));
            }
        }

        let updated = self
            .db
            .update_registration_status(registration_id, next.as_str())
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Registration not found")))?;

        REGISTRATIONS_TOTAL
            .with_label_values(&[next.as_str()])
            .inc();

        Ok(updated)
    }

    /// Delete a registration and, transactionally, every invoice that
    /// references it.
    #[instrument(skip(self), fields(registration_id = %registration_id))]
    pub async fn remove(&self, registration_id: Uuid) -> Result<Uuid, AppError> {
        self.db
            .get_registration(registration_id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Registration not found")))?;

        self.db.delete_registration_cascade(registration_id).await?;

        Ok(registration_id)
    }
}
