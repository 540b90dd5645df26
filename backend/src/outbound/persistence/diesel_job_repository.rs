//! PostgreSQL-backed read side of the job catalogue.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{JobRepository, JobRepositoryError};
use crate::domain::{Job, JobId};

use super::diesel_error_mapping::StoreFailure;
use super::models::JobRow;
use super::pool::DbPool;
use super::schema::jobs;

#[derive(Clone)]
pub struct DieselJobRepository {
    pool: DbPool,
}

impl DieselJobRepository {
    /// Create a repository backed by `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: impl Into<StoreFailure>) -> JobRepositoryError {
    match failure.into() {
        StoreFailure::Connection(message) => JobRepositoryError::connection(message),
        other => JobRepositoryError::query(other.describe()),
    }
}

#[async_trait]
impl JobRepository for DieselJobRepository {
    async fn find_by_id(&self, id: &JobId) -> Result<Option<Job>, JobRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row = jobs::table
            .filter(jobs::id.eq(id.as_uuid()))
            .select(JobRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_failure)?;
        row.map(Job::try_from)
            .transpose()
            .map_err(JobRepositoryError::query)
    }

    async fn find_many(&self, ids: &[JobId]) -> Result<Vec<Job>, JobRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let uuids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let rows = jobs::table
            .filter(jobs::id.eq_any(uuids))
            .select(JobRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_failure)?;
        rows.into_iter()
            .map(Job::try_from)
            .collect::<Result<_, _>>()
            .map_err(JobRepositoryError::query)
    }
}
