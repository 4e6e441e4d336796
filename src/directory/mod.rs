pub mod handlers;
pub mod models;
pub mod repository;

pub use models::{Candidate, CandidateStatus, Client};
pub use repository::DirectoryRepository;
