pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod models;

// Re-export commonly used types
pub use api::{router, AppState};
pub use config::{Config, ConfigError};
pub use db::{create_pool, DatabaseError, Repositories};
pub use domain::{Actor, DomainError, HbnbFacade};
