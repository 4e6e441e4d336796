pub mod handlers;
pub mod lifecycle;
pub mod models;
pub mod repository;

pub use lifecycle::BillingEngine;
pub use models::{BatchStatus, PaymentBatch, PaymentHistoryEntry};
pub use repository::BillingRepository;
