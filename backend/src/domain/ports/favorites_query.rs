//! Driving port for reading a user's favorite jobs.

use async_trait::async_trait;

use crate::domain::{Error, Job, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FavoritesQuery: Send + Sync {
    /// Favorite jobs, most recently added first.
    async fn list(&self, user_id: &UserId) -> Result<Vec<Job>, Error>;
}
