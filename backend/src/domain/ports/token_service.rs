//! Port for signing and verifying bearer tokens.
//!
//! Implementations are pure: they never consult the credential store and
//! hold only the immutable signing key plus a clock.

use crate::domain::{IssuedToken, Role, TokenClaims, UserId};

use super::define_port_error;

define_port_error! {
    /// Reasons a token could not be issued or verified.
    pub enum TokenError {
        /// Signature did not match the payload.
        InvalidSignature => "token signature is invalid",
        /// `exp` is not after the current time.
        Expired => "token has expired",
        /// Token is not a structurally valid signed token.
        Malformed { message: String } => "token is malformed: {message}",
        /// Signing failed.
        Signing { message: String } => "token could not be signed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Sign a token for `user_id` with `role`, valid for the configured TTL.
    fn issue(&self, user_id: &UserId, role: Role) -> Result<IssuedToken, TokenError>;

    /// Check signature and expiry, returning the embedded claims.
    fn verify(&self, token: &str) -> Result<TokenClaims, TokenError>;
}
