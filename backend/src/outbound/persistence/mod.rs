//! PostgreSQL adapters for the repository ports, built on Diesel with
//! `diesel-async` connections pooled by `bb8`.
//!
//! Row structs and the `table!` schema stay private to this module. Every
//! repository reduces Diesel failures to a `StoreFailure` first and then to
//! its own port error, so constraint names are interpreted in one place.
//!
//! ```ignore
//! use jobboard::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/jobboard")).await?;
//! let users = DieselUserRepository::new(pool);
//! ```

mod diesel_application_repository;
mod diesel_error_mapping;
mod diesel_favorites_repository;
mod diesel_job_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_application_repository::DieselApplicationRepository;
pub use diesel_favorites_repository::DieselFavoritesRepository;
pub use diesel_job_repository::DieselJobRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
