//! Domain models for registration-service.

mod dashboard;
mod invoice;
mod invoice_item;
mod pagination;
mod registration;

pub use dashboard::{DashboardStats, RecentRegistration, StatusBucket};
pub use invoice::{
    CreateInvoiceRequest, Invoice, InvoiceStatus, InvoiceWithItems, UpdateInvoiceRequest,
};
pub use invoice_item::{InvoiceItem, InvoiceItemRequest};
pub use pagination::{ListParams, Page, PaginatedResponse, PaginationMeta, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use registration::{
    CreateRegistrationRequest, Registration, RegistrationBrief, RegistrationStatus,
    RegistrationWithCount, UpdateStatusRequest,
};
