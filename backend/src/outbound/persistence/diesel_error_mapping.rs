//! Classification of pool and Diesel failures shared by the repositories.
//!
//! Each repository turns a [`StoreFailure`] into its own port error, so the
//! mapping from PostgreSQL constraint violations to domain conflicts lives in
//! one place.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Storage failure reduced to the cases the ports distinguish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StoreFailure {
    /// The pool or connection is unavailable.
    Connection(String),
    /// A unique constraint or primary key rejected the write.
    UniqueViolation { constraint: Option<String> },
    /// A foreign key rejected the write.
    ForeignKeyViolation { constraint: Option<String> },
    /// Any other query failure.
    Query(String),
}

impl StoreFailure {
    /// Whether the violated constraint guards `column`.
    pub(crate) fn involves(constraint: Option<&str>, column: &str) -> bool {
        constraint.is_some_and(|name| name.contains(column))
    }
}

impl From<PoolError> for StoreFailure {
    fn from(error: PoolError) -> Self {
        match error {
            PoolError::Checkout { message } | PoolError::Build { message } => {
                Self::Connection(message)
            }
        }
    }
}

impl From<DieselError> for StoreFailure {
    fn from(error: DieselError) -> Self {
        match error {
            DieselError::DatabaseError(kind, info) => {
                debug!(?kind, message = info.message(), "diesel operation failed");
                let constraint = info.constraint_name().map(str::to_owned);
                match kind {
                    DatabaseErrorKind::UniqueViolation => Self::UniqueViolation { constraint },
                    DatabaseErrorKind::ForeignKeyViolation => {
                        Self::ForeignKeyViolation { constraint }
                    }
                    DatabaseErrorKind::ClosedConnection => {
                        Self::Connection("database connection error".to_owned())
                    }
                    _ => Self::Query("database error".to_owned()),
                }
            }
            DieselError::NotFound => Self::Query("record not found".to_owned()),
            DieselError::QueryBuilderError(_) => Self::Query("database query error".to_owned()),
            other => {
                debug!(error = %other, "diesel operation failed");
                Self::Query("database error".to_owned())
            }
        }
    }
}

impl StoreFailure {
    /// Message for failures that are not constraint violations.
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Connection(message) | Self::Query(message) => message.clone(),
            Self::UniqueViolation { constraint } => {
                format!("unique constraint violated: {}", constraint.as_deref().unwrap_or("unknown"))
            }
            Self::ForeignKeyViolation { constraint } => format!(
                "foreign key violated: {}",
                constraint.as_deref().unwrap_or("unknown")
            ),
        }
    }
}
