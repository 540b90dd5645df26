//! Driving port for application listings.

use async_trait::async_trait;

use crate::domain::{ApplicationView, Error, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationQuery: Send + Sync {
    /// The user's own applications with job details, most recent first.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<ApplicationView>, Error>;

    /// Every application with job and applicant details, most recent first.
    async fn list_all(&self) -> Result<Vec<ApplicationView>, Error>;
}
