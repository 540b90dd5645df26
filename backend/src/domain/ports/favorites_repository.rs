//! Port for favorite-job membership.
//!
//! Each mutation is one atomic statement keyed by `(user_id, job_id)`, so
//! concurrent add/remove calls for one user never overwrite each other.
use async_trait::async_trait;

use crate::domain::{JobId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by favorites repository adapters.
    pub enum FavoritesRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "favorites repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "favorites repository query failed: {message}",
        /// The referenced job does not exist.
        UnknownJob => "referenced job does not exist",
        /// The referenced user does not exist.
        UnknownUser => "referenced user does not exist",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FavoritesRepository: Send + Sync {
    /// Add `job_id` to the user's set. Returns `true` when a row was inserted
    /// and `false` when it was already present.
    async fn add(&self, user_id: &UserId, job_id: &JobId) -> Result<bool, FavoritesRepositoryError>;

    /// Remove `job_id` from the user's set. Returns `true` when a row was
    /// deleted.
    async fn remove(
        &self,
        user_id: &UserId,
        job_id: &JobId,
    ) -> Result<bool, FavoritesRepositoryError>;

    /// Favorite job ids, most recently added first.
    async fn list(&self, user_id: &UserId) -> Result<Vec<JobId>, FavoritesRepositoryError>;
}
