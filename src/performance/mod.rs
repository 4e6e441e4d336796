pub mod handlers;
pub mod models;
pub mod repository;

pub use models::{RecordPaymentState, SyncRecord};
pub use repository::PerformanceRepository;
