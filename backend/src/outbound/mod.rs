//! Outbound adapters implementing the domain's driven ports.
//!
//! - **persistence**: PostgreSQL repositories on Diesel.
//! - **memory**: process-local repositories for development and tests.
//! - **security**: Argon2id hashing, HS256 tokens and signing-key loading.
//! - **storage**: filesystem resume store.
//!
//! Adapters translate between domain types and infrastructure
//! representations; they hold no business rules.

pub mod memory;
pub mod persistence;
pub mod security;
pub mod storage;
