//! Driving port for registration and login.
//!
//! Inbound adapters call this port to create accounts and exchange
//! credentials for a bearer token without importing persistence or crypto.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, LoginOutcome, Registration, UserProfile};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityCommand: Send + Sync {
    /// Create an account.
    ///
    /// # Errors
    ///
    /// - `invalid_request` with reason `email_taken` when the email exists.
    /// - `forbidden` when admin self-registration is disabled.
    async fn register(&self, registration: Registration) -> Result<UserProfile, Error>;

    /// Verify credentials and issue a token.
    ///
    /// # Errors
    ///
    /// `invalid_request` with reason `invalid_credentials` for an unknown
    /// email or a wrong password; the two are indistinguishable.
    async fn login(&self, credentials: LoginCredentials) -> Result<LoginOutcome, Error>;
}
