//! Port for one-way password hashing.
//!
//! Hashing is CPU bound; async callers run it on the blocking pool.

use crate::domain::PasswordHash;

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashers.
    pub enum PasswordHasherError {
        /// Hash computation failed.
        Hashing { message: String } => "password hashing failed: {message}",
        /// Stored hash could not be parsed.
        InvalidHash { message: String } => "stored password hash is invalid: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash `password` with a fresh random salt.
    fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHasherError>;

    /// Whether `password` matches `hash`.
    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHasherError>;
}
