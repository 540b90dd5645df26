//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see driving ports, so
//! they can be exercised with mocks and no I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccessGate, ApplicationCommand, ApplicationQuery, FavoritesCommand, FavoritesQuery,
    IdentityCommand, ResumeStore,
};

/// Default cap on uploaded resume size: 5 MiB.
pub const DEFAULT_MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;

/// Parameter object bundling the port implementations used by handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub identity: Arc<dyn IdentityCommand>,
    pub gate: Arc<dyn AccessGate>,
    pub applications: Arc<dyn ApplicationCommand>,
    pub applications_query: Arc<dyn ApplicationQuery>,
    pub favorites: Arc<dyn FavoritesCommand>,
    pub favorites_query: Arc<dyn FavoritesQuery>,
    pub resumes: Arc<dyn ResumeStore>,
}

/// Request-size limits enforced by the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadLimits {
    pub max_resume_bytes: usize,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_resume_bytes: DEFAULT_MAX_RESUME_BYTES,
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub identity: Arc<dyn IdentityCommand>,
    pub gate: Arc<dyn AccessGate>,
    pub applications: Arc<dyn ApplicationCommand>,
    pub applications_query: Arc<dyn ApplicationQuery>,
    pub favorites: Arc<dyn FavoritesCommand>,
    pub favorites_query: Arc<dyn FavoritesQuery>,
    pub resumes: Arc<dyn ResumeStore>,
    pub limits: UploadLimits,
}

impl HttpState {
    /// Bundle the driving ports with the request limits.
    pub fn new(ports: HttpStatePorts, limits: UploadLimits) -> Self {
        let HttpStatePorts {
            identity,
            gate,
            applications,
            applications_query,
            favorites,
            favorites_query,
            resumes,
        } = ports;
        Self {
            identity,
            gate,
            applications,
            applications_query,
            favorites,
            favorites_query,
            resumes,
            limits,
        }
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports, UploadLimits::default())
    }
}
