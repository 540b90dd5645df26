//! Domain ports defining the edges of the hexagon.
//!
//! Driven ports (repositories, token signing, hashing, resume storage) are
//! implemented by outbound adapters. Driving ports (commands, queries and the
//! access gate) are implemented by domain services and consumed by inbound
//! adapters. Each driven port exposes a typed error generated by
//! [`define_port_error!`] so adapters map their failures into predictable
//! variants.

mod macros;
pub(crate) use macros::define_port_error;

mod access_gate;
mod application_command;
mod application_query;
mod application_repository;
mod favorites_command;
mod favorites_query;
mod favorites_repository;
mod identity_command;
mod job_repository;
mod password_hasher;
mod resume_store;
mod token_service;
mod user_repository;

pub use access_gate::AccessGate;
#[cfg(test)]
pub use access_gate::MockAccessGate;
pub use application_command::ApplicationCommand;
#[cfg(test)]
pub use application_command::MockApplicationCommand;
pub use application_query::ApplicationQuery;
#[cfg(test)]
pub use application_query::MockApplicationQuery;
#[cfg(test)]
pub use application_repository::MockApplicationRepository;
pub use application_repository::{ApplicationRepository, ApplicationRepositoryError};
#[cfg(test)]
pub use favorites_command::MockFavoritesCommand;
pub use favorites_command::{FavoriteChange, FavoritesCommand};
pub use favorites_query::FavoritesQuery;
#[cfg(test)]
pub use favorites_query::MockFavoritesQuery;
#[cfg(test)]
pub use favorites_repository::MockFavoritesRepository;
pub use favorites_repository::{FavoritesRepository, FavoritesRepositoryError};
pub use identity_command::IdentityCommand;
#[cfg(test)]
pub use identity_command::MockIdentityCommand;
#[cfg(test)]
pub use job_repository::MockJobRepository;
pub use job_repository::{JobRepository, JobRepositoryError};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use resume_store::MockResumeStore;
pub use resume_store::{ResumeStore, ResumeStoreError, ResumeUpload};
#[cfg(test)]
pub use token_service::MockTokenService;
pub use token_service::{TokenError, TokenService};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
