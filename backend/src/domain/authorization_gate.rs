//! Authorization gate implementing [`AccessGate`].
//!
//! Per request the gate walks `NoToken -> TokenRejected -> UserNotFound ->
//! RoleDenied -> Authorized`, stopping at the first failing state. Every state
//! other than `RoleDenied` and `Authorized` fails closed as `unauthorized`.
//! The stored role decides access, not the role carried in the token, and the
//! user record is read exactly once.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::error::reason;
use crate::domain::ports::{AccessGate, TokenError, TokenService, UserRepository};
use crate::domain::{BearerToken, Error, Principal, RoleSet};

/// Gate composed from the token service and the credential store.
#[derive(Clone)]
pub struct AuthorizationGate<U, T> {
    users: Arc<U>,
    tokens: Arc<T>,
}

impl<U, T> AuthorizationGate<U, T> {
    /// Create a gate that verifies tokens with `tokens` and resolves accounts through `users`.
    pub fn new(users: Arc<U>, tokens: Arc<T>) -> Self {
        Self { users, tokens }
    }
}

fn unauthenticated(message: &str) -> Error {
    Error::unauthorized(message)
}

#[async_trait]
impl<U, T> AccessGate for AuthorizationGate<U, T>
where
    U: UserRepository,
    T: TokenService,
{
    async fn authorize(
        &self,
        bearer: Option<BearerToken>,
        allowed: RoleSet,
    ) -> Result<Principal, Error> {
        let Some(bearer) = bearer else {
            debug!(state = "no_token", "request rejected");
            return Err(unauthenticated("authentication required"));
        };

        let claims = self.tokens.verify(bearer.as_str()).map_err(|err| {
            let kind = match err {
                TokenError::Expired => "expired",
                TokenError::InvalidSignature => "invalid_signature",
                _ => "malformed",
            };
            debug!(state = "token_rejected", kind, "request rejected");
            unauthenticated("invalid or expired token")
        })?;

        let user = match self.users.find_by_id(&claims.user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                warn!(state = "user_not_found", user_id = %claims.user_id, "request rejected");
                return Err(unauthenticated("invalid or expired token")
                    .with_reason(reason::USER_NOT_FOUND));
            }
            Err(err) => {
                warn!(state = "user_lookup_failed", error = %err, "request rejected");
                return Err(unauthenticated("unable to verify credentials"));
            }
        };

        if !allowed.permits(user.role) {
            debug!(state = "role_denied", user_id = %user.id, role = %user.role, "request rejected");
            return Err(Error::forbidden("insufficient role").with_reason(reason::ROLE_DENIED));
        }

        Ok(Principal::new(user.profile()))
    }
}
