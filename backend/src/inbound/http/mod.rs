//! HTTP inbound adapter exposing the REST endpoints.

pub mod applications;
pub mod auth;
pub mod error;
pub mod favorites;
pub mod health;
pub mod identity;
pub mod routes;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;
