pub mod handlers;
pub mod models;
pub mod repository;

pub use models::{rank, LeaderboardRow, SnapshotRow};
pub use repository::LeaderboardRepository;
