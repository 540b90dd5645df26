//! Port for application persistence.
//!
//! The `(job_id, user_id)` uniqueness invariant is owned by the adapter's
//! storage constraint: [`ApplicationRepository::insert`] must fail with
//! [`ApplicationRepositoryError::Duplicate`] rather than write a second row.
use async_trait::async_trait;

use crate::domain::{Application, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by application repository adapters.
    pub enum ApplicationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "application repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "application repository query failed: {message}",
        /// An application for the same job and user already exists.
        Duplicate => "application already exists for this job and user",
        /// The referenced job does not exist.
        UnknownJob => "referenced job does not exist",
        /// The referenced user does not exist.
        UnknownUser => "referenced user does not exist",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Insert a new application as a single atomic statement.
    async fn insert(&self, application: &Application) -> Result<(), ApplicationRepositoryError>;

    /// Applications submitted by `user_id`, most recent first.
    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Application>, ApplicationRepositoryError>;

    /// Every application, most recent first.
    async fn list_all(&self) -> Result<Vec<Application>, ApplicationRepositoryError>;
}
