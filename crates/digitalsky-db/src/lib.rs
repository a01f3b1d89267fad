pub mod application_repository;
pub mod config;
pub mod database;

pub use application_repository::ApplicationRepository;
pub use config::DatabaseConfig;
pub use database::Database;
