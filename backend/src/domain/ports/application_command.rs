//! Driving port for submitting applications.

use async_trait::async_trait;

use crate::domain::{Application, ApplicationSubmission, Error};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationCommand: Send + Sync {
    /// Record an application.
    ///
    /// # Errors
    ///
    /// - `not_found` with reason `job_not_found` when the job is unknown.
    /// - `invalid_request` with reason `already_applied` when the user has
    ///   already applied; storage is left unchanged.
    async fn submit(&self, submission: ApplicationSubmission) -> Result<Application, Error>;
}
