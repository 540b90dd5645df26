//! Driving port for request authorization.

use async_trait::async_trait;

use crate::domain::{BearerToken, Error, Principal, RoleSet};

/// Resolves the acting principal for a request.
///
/// Fails closed: a missing or malformed header, a rejected token, an unknown
/// user, and any store failure all yield `unauthorized`; only a role outside
/// `allowed` yields `forbidden`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccessGate: Send + Sync {
    async fn authorize(
        &self,
        bearer: Option<BearerToken>,
        allowed: RoleSet,
    ) -> Result<Principal, Error>;
}
