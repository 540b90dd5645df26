//! Driving port for favorites toggling.

use async_trait::async_trait;

use crate::domain::{Error, JobId, UserId};

/// Outcome of an idempotent favorites mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteChange {
    /// The set changed.
    Applied,
    /// The set already had the requested shape.
    Unchanged,
}

impl FavoriteChange {
    /// Map a repository "rows affected" flag.
    ///
    /// # Examples
    /// ```
    /// use jobboard::domain::ports::FavoriteChange;
    ///
    /// assert_eq!(FavoriteChange::from_changed(true), FavoriteChange::Applied);
    /// assert_eq!(FavoriteChange::from_changed(false), FavoriteChange::Unchanged);
    /// ```
    pub fn from_changed(changed: bool) -> Self {
        if changed { Self::Applied } else { Self::Unchanged }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FavoritesCommand: Send + Sync {
    /// Add a job to the favorite set; a no-op when already present.
    async fn add(&self, user_id: &UserId, job_id: &JobId) -> Result<FavoriteChange, Error>;

    /// Remove a job from the favorite set; a no-op when absent.
    async fn remove(&self, user_id: &UserId, job_id: &JobId) -> Result<FavoriteChange, Error>;
}
