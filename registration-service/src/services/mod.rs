//! Services module for registration-service.

pub mod dashboard;
pub mod database;
pub mod finance;
pub mod invoice;
pub mod metrics;
pub mod numbering;
pub mod registration;

pub use dashboard::DashboardService;
pub use database::Database;
pub use invoice::InvoiceService;
pub use metrics::{get_metrics, init_metrics};
pub use registration::RegistrationService;
