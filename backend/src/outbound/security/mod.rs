//! Credential adapters: Argon2id password hashing and HS256 bearer tokens.

mod argon2_hasher;
mod jwt_token_service;
pub mod token_key;

pub use argon2_hasher::Argon2PasswordHasher;
pub use jwt_token_service::JwtTokenService;
pub use token_key::{BuildMode, TokenKey, TokenKeyError, token_key_from_env};
