//! PostgreSQL-backed `ApplicationRepository`.
//!
//! The `applications_job_user_key` unique constraint is what keeps a user to
//! one application per job; the insert is a single statement and a violation
//! is reported as [`ApplicationRepositoryError::Duplicate`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ApplicationRepository, ApplicationRepositoryError};
use crate::domain::{Application, UserId};

use super::diesel_error_mapping::StoreFailure;
use super::models::{ApplicationRow, NewApplicationRow};
use super::pool::DbPool;
use super::schema::applications;

#[derive(Clone)]
pub struct DieselApplicationRepository {
    pool: DbPool,
}

impl DieselApplicationRepository {
    /// Create a repository backed by `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: impl Into<StoreFailure>) -> ApplicationRepositoryError {
    match failure.into() {
        StoreFailure::Connection(message) => ApplicationRepositoryError::connection(message),
        StoreFailure::UniqueViolation { constraint }
            if StoreFailure::involves(constraint.as_deref(), "job_user") =>
        {
            ApplicationRepositoryError::Duplicate
        }
        StoreFailure::ForeignKeyViolation { constraint }
            if StoreFailure::involves(constraint.as_deref(), "job_id") =>
        {
            ApplicationRepositoryError::UnknownJob
        }
        StoreFailure::ForeignKeyViolation { constraint }
            if StoreFailure::involves(constraint.as_deref(), "user_id") =>
        {
            ApplicationRepositoryError::UnknownUser
        }
        other => ApplicationRepositoryError::query(other.describe()),
    }
}

fn into_applications(
    rows: Vec<ApplicationRow>,
) -> Result<Vec<Application>, ApplicationRepositoryError> {
    rows.into_iter()
        .map(Application::try_from)
        .collect::<Result<_, _>>()
        .map_err(ApplicationRepositoryError::query)
}

#[async_trait]
impl ApplicationRepository for DieselApplicationRepository {
    async fn insert(&self, application: &Application) -> Result<(), ApplicationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        diesel::insert_into(applications::table)
            .values(NewApplicationRow::from(application))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_failure)
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Application>, ApplicationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let rows = applications::table
            .filter(applications::user_id.eq(user_id.as_uuid()))
            .order(applications::applied_at.desc())
            .select(ApplicationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_failure)?;
        into_applications(rows)
    }

    async fn list_all(&self) -> Result<Vec<Application>, ApplicationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let rows = applications::table
            .order(applications::applied_at.desc())
            .select(ApplicationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_failure)?;
        into_applications(rows)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn job_user_unique_violation_is_duplicate() {
        let failure = StoreFailure::UniqueViolation {
            constraint: Some("applications_job_user_key".to_owned()),
        };
        assert_eq!(map_failure(failure), ApplicationRepositoryError::Duplicate);
    }

    #[rstest]
    #[case("applications_job_id_fkey", ApplicationRepositoryError::UnknownJob)]
    #[case("applications_user_id_fkey", ApplicationRepositoryError::UnknownUser)]
    fn foreign_keys_are_told_apart(
        #[case] constraint: &str,
        #[case] expected: ApplicationRepositoryError,
    ) {
        let failure = StoreFailure::ForeignKeyViolation {
            constraint: Some(constraint.to_owned()),
        };
        assert_eq!(map_failure(failure), expected);
    }

    #[rstest]
    fn unnamed_foreign_key_stays_a_query_failure() {
        let failure = StoreFailure::ForeignKeyViolation { constraint: None };
        assert!(matches!(
            map_failure(failure),
            ApplicationRepositoryError::Query { .. }
        ));
    }
}
