//! PostgreSQL-backed `FavoritesRepository`.
//!
//! Add is `INSERT .. ON CONFLICT DO NOTHING` and remove is a keyed `DELETE`;
//! the affected row count tells the caller whether the set changed.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{FavoritesRepository, FavoritesRepositoryError};
use crate::domain::{JobId, UserId};

use super::diesel_error_mapping::StoreFailure;
use super::models::NewFavoriteRow;
use super::pool::DbPool;
use super::schema::user_favorites;

#[derive(Clone)]
pub struct DieselFavoritesRepository {
    pool: DbPool,
}

impl DieselFavoritesRepository {
    /// Create a repository backed by `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: impl Into<StoreFailure>) -> FavoritesRepositoryError {
    match failure.into() {
        StoreFailure::Connection(message) => FavoritesRepositoryError::connection(message),
        StoreFailure::ForeignKeyViolation { constraint }
            if StoreFailure::involves(constraint.as_deref(), "job_id") =>
        {
            FavoritesRepositoryError::UnknownJob
        }
        StoreFailure::ForeignKeyViolation { constraint }
            if StoreFailure::involves(constraint.as_deref(), "user_id") =>
        {
            FavoritesRepositoryError::UnknownUser
        }
        other => FavoritesRepositoryError::query(other.describe()),
    }
}

#[async_trait]
impl FavoritesRepository for DieselFavoritesRepository {
    async fn add(&self, user_id: &UserId, job_id: &JobId) -> Result<bool, FavoritesRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let inserted = diesel::insert_into(user_favorites::table)
            .values(NewFavoriteRow {
                user_id: *user_id.as_uuid(),
                job_id: *job_id.as_uuid(),
            })
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_failure)?;
        Ok(inserted > 0)
    }

    async fn remove(
        &self,
        user_id: &UserId,
        job_id: &JobId,
    ) -> Result<bool, FavoritesRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let deleted = diesel::delete(
            user_favorites::table
                .filter(user_favorites::user_id.eq(user_id.as_uuid()))
                .filter(user_favorites::job_id.eq(job_id.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_failure)?;
        Ok(deleted > 0)
    }

    async fn list(&self, user_id: &UserId) -> Result<Vec<JobId>, FavoritesRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let ids: Vec<Uuid> = user_favorites::table
            .filter(user_favorites::user_id.eq(user_id.as_uuid()))
            .order(user_favorites::added_at.desc())
            .select(user_favorites::job_id)
            .load(&mut conn)
            .await
            .map_err(map_failure)?;
        Ok(ids.into_iter().map(JobId::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("user_favorites_job_id_fkey", FavoritesRepositoryError::UnknownJob)]
    #[case("user_favorites_user_id_fkey", FavoritesRepositoryError::UnknownUser)]
    fn foreign_keys_are_told_apart(
        #[case] constraint: &str,
        #[case] expected: FavoritesRepositoryError,
    ) {
        let failure = StoreFailure::ForeignKeyViolation {
            constraint: Some(constraint.to_owned()),
        };
        assert_eq!(map_failure(failure), expected);
    }
}
