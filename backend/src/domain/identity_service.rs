//! Registration and login.
//!
//! Composes the credential store, the password hasher and the token service.
//! Hashing runs on Tokio's blocking pool so Argon2 never stalls a worker.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::domain::error::reason;
use crate::domain::ports::{
    IdentityCommand, PasswordHasher, PasswordHasherError, TokenError, TokenService,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    Error, LoginCredentials, LoginOutcome, PasswordHash, Registration, Role, User, UserId,
    UserProfile,
};

/// Self-registration policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignupPolicy {
    /// Whether callers may register themselves as admins.
    pub allow_admin: bool,
}

/// Identity service implementing [`IdentityCommand`].
#[derive(Clone)]
pub struct IdentityService<U, H, T> {
    users: Arc<U>,
    hasher: Arc<H>,
    tokens: Arc<T>,
    clock: Arc<dyn Clock>,
    policy: SignupPolicy,
}

impl<U, H, T> IdentityService<U, H, T> {
    /// Create the identity service.
    ///
    /// `policy` decides whether admin self-registration is accepted.
    pub fn new(
        users: Arc<U>,
        hasher: Arc<H>,
        tokens: Arc<T>,
        clock: Arc<dyn Clock>,
        policy: SignupPolicy,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            clock,
            policy,
        }
    }
}

fn invalid_credentials() -> Error {
    Error::invalid_request("invalid credentials").with_reason(reason::INVALID_CREDENTIALS)
}

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { .. } => {
            Error::invalid_request("email already registered").with_reason(reason::EMAIL_TAKEN)
        }
    }
}

fn map_hasher_error(error: PasswordHasherError) -> Error {
    Error::internal(error.to_string())
}

fn map_token_error(error: TokenError) -> Error {
    Error::internal(format!("failed to issue token: {error}"))
}

impl<U, H, T> IdentityService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
    T: TokenService,
{
    async fn hash_password(&self, password: &str) -> Result<PasswordHash, Error> {
        let hasher = Arc::clone(&self.hasher);
        let password = Zeroizing::new(password.to_owned());
        tokio::task::spawn_blocking(move || hasher.hash(password.as_str()))
            .await
            .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
            .map_err(map_hasher_error)
    }

    async fn verify_password(&self, password: &str, hash: PasswordHash) -> Result<bool, Error> {
        let hasher = Arc::clone(&self.hasher);
        let password = Zeroizing::new(password.to_owned());
        tokio::task::spawn_blocking(move || hasher.verify(password.as_str(), &hash))
            .await
            .map_err(|err| Error::internal(format!("password verification task failed: {err}")))?
            .map_err(map_hasher_error)
    }
}

#[async_trait]
impl<U, H, T> IdentityCommand for IdentityService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
    T: TokenService,
{
    async fn register(&self, registration: Registration) -> Result<UserProfile, Error> {
        if registration.role() == Role::Admin && !self.policy.allow_admin {
            return Err(Error::forbidden("admin self-registration is disabled"));
        }

        let password_hash = self.hash_password(registration.password()).await?;
        let user = User {
            id: UserId::random(),
            email: registration.email().clone(),
            password_hash,
            role: registration.role(),
            first_name: registration.first_name().clone(),
            last_name: registration.last_name().clone(),
            created_at: self.clock.utc(),
        };

        self.users.insert(&user).await.map_err(map_user_error)?;
        info!(user_id = %user.id, role = %user.role, "account registered");
        Ok(user.profile())
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<LoginOutcome, Error> {
        let Some(user) = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_error)?
        else {
            debug!("login rejected: unknown email");
            return Err(invalid_credentials());
        };

        let matches = self
            .verify_password(credentials.password(), user.password_hash.clone())
            .await?;
        if !matches {
            debug!(user_id = %user.id, "login rejected: password mismatch");
            return Err(invalid_credentials());
        }

        let token = self
            .tokens
            .issue(&user.id, user.role)
            .map_err(map_token_error)?;
        info!(user_id = %user.id, expires_at = %token.expires_at, "token issued");
        Ok(LoginOutcome {
            token,
            role: user.role,
            first_name: user.first_name,
        })
    }
}

#[cfg(test)]
#[path = "identity_service_tests.rs"]
mod tests;
