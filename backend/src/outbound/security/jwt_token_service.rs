//! HS256 implementation of the `TokenService` port.
//!
//! Claims are `sub` (user id), `role`, `iat` and `exp` in Unix seconds.
//! Expiry is checked against the injected clock with no leeway rather than
//! by `jsonwebtoken`, which reads the system time.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};

use crate::domain::ports::{TokenError, TokenService};
use crate::domain::{BearerToken, IssuedToken, Role, TokenClaims, UserId};

use super::token_key::TokenKey;

#[derive(Debug, Serialize, Deserialize)]
struct JwtClaims {
    sub: String,
    role: String,
    iat: i64,
    exp: i64,
}

/// Signs and verifies bearer tokens with a symmetric key.
pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl JwtTokenService {
    /// Sign with `key`; tokens expire `ttl` after the clock's current time.
    pub fn new(key: &TokenKey, ttl: TimeDelta, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding: EncodingKey::from_secret(key.as_bytes()),
            decoding: DecodingKey::from_secret(key.as_bytes()),
            ttl,
            clock,
        }
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation
    }
}

fn timestamp(seconds: i64) -> Result<DateTime<Utc>, TokenError> {
    DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| TokenError::malformed(format!("timestamp {seconds} out of range")))
}

fn map_decode_error(error: jsonwebtoken::errors::Error) -> TokenError {
    match error.kind() {
        ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::malformed(error.to_string()),
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, user_id: &UserId, role: Role) -> Result<IssuedToken, TokenError> {
        let now = self.clock.utc();
        let claims = JwtClaims {
            sub: user_id.to_string(),
            role: role.as_str().to_owned(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| TokenError::signing(err.to_string()))?;
        let expires_at = timestamp(claims.exp).map_err(|err| TokenError::signing(err.to_string()))?;
        Ok(IssuedToken {
            token: BearerToken::new(token),
            expires_at,
        })
    }

    fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let data = decode::<JwtClaims>(token, &self.decoding, &Self::validation())
            .map_err(map_decode_error)?;
        let claims = data.claims;
        if self.clock.utc().timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }
        let user_id = claims
            .sub
            .parse::<UserId>()
            .map_err(|err| TokenError::malformed(err.to_string()))?;
        let role = claims
            .role
            .parse::<Role>()
            .map_err(|err| TokenError::malformed(err.to_string()))?;
        Ok(TokenClaims {
            user_id,
            role,
            issued_at: timestamp(claims.iat)?,
            expires_at: timestamp(claims.exp)?,
        })
    }
}
