//! Bearer token extraction and the per-handler authorization call.
//!
//! Handlers call [`authorize`] once with the roles the operation admits and
//! get back a typed [`Principal`] or the gate's error.

use actix_web::HttpRequest;
use actix_web::http::header::AUTHORIZATION;

use crate::domain::{BearerToken, Principal, RoleSet};

use super::ApiResult;
use super::state::HttpState;

const BEARER_PREFIX: &str = "Bearer ";

/// Token from an `Authorization: Bearer <token>` header.
///
/// Missing, non-UTF-8, non-bearer and blank headers all yield `None`.
pub fn bearer_token(req: &HttpRequest) -> Option<BearerToken> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let scheme = value.get(..BEARER_PREFIX.len())?;
    if !scheme.eq_ignore_ascii_case(BEARER_PREFIX) {
        return None;
    }
    let token = value[BEARER_PREFIX.len()..].trim();
    (!token.is_empty()).then(|| BearerToken::new(token))
}

/// Authenticate the request and check its role against `allowed`.
pub async fn authorize(
    state: &HttpState,
    req: &HttpRequest,
    allowed: RoleSet,
) -> ApiResult<Principal> {
    state.gate.authorize(bearer_token(req), allowed).await
}
