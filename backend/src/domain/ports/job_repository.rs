//! Read-only job catalogue port.
//!
//! Listing and search belong to the catalogue service; the workflows only
//! need existence checks and display fields for the jobs they reference.
use async_trait::async_trait;

use crate::domain::{Job, JobId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by job catalogue adapters.
    pub enum JobRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "job repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "job repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Fetch a job by identifier.
    async fn find_by_id(&self, id: &JobId) -> Result<Option<Job>, JobRepositoryError>;

    /// Fetch every job whose id appears in `ids`. Unknown ids are skipped and
    /// the result order is unspecified.
    async fn find_many(&self, ids: &[JobId]) -> Result<Vec<Job>, JobRepositoryError>;
}
