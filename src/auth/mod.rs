pub mod models;
pub mod repository;

pub use models::{AdminAccess, Role};
pub use repository::AccessRepository;
