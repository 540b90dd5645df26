//! Port for resume uploads.
//!
//! The store turns uploaded bytes into an opaque [`ResumeRef`]; nothing else
//! in the core interprets the reference.
use async_trait::async_trait;

use crate::domain::ResumeRef;

use super::define_port_error;

define_port_error! {
    /// Errors raised by resume store adapters.
    pub enum ResumeStoreError {
        /// Upload was rejected before storage (empty body, bad extension).
        Rejected { message: String } => "resume rejected: {message}",
        /// The backing storage failed.
        Io { message: String } => "resume storage failed: {message}",
    }
}

/// Uploaded resume content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeUpload {
    /// Client-supplied file name, used only to pick an extension.
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResumeStore: Send + Sync {
    /// Persist the upload and return its reference.
    async fn store(&self, upload: ResumeUpload) -> Result<ResumeRef, ResumeStoreError>;

    /// Delete a stored resume. Missing files are not an error.
    async fn discard(&self, resume: &ResumeRef) -> Result<(), ResumeStoreError>;
}
