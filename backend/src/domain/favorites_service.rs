//! Favorite-job toggling.
//!
//! Mutations go straight to the repository's single-statement add/remove, so
//! repeated or concurrent calls converge on the same set without a
//! read-modify-write of the whole collection.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::application_service::{job_not_found, map_job_error, user_not_found};
use crate::domain::ports::{
    FavoriteChange, FavoritesCommand, FavoritesQuery, FavoritesRepository,
    FavoritesRepositoryError, JobRepository,
};
use crate::domain::{Error, Job, JobId, UserId};

/// Favorites workflow implementing the favorites driving ports.
#[derive(Clone)]
pub struct FavoritesService<F, J> {
    favorites: Arc<F>,
    jobs: Arc<J>,
}

impl<F, J> FavoritesService<F, J> {
    /// Build the service over a favorites store and the job catalogue.
    pub fn new(favorites: Arc<F>, jobs: Arc<J>) -> Self {
        Self { favorites, jobs }
    }
}

fn map_favorites_error(error: FavoritesRepositoryError) -> Error {
    match error {
        FavoritesRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("favorites repository unavailable: {message}"))
        }
        FavoritesRepositoryError::Query { message } => {
            Error::internal(format!("favorites repository error: {message}"))
        }
        FavoritesRepositoryError::UnknownJob => job_not_found(),
        FavoritesRepositoryError::UnknownUser => user_not_found(),
    }
}

#[async_trait]
impl<F, J> FavoritesCommand for FavoritesService<F, J>
where
    F: FavoritesRepository,
    J: JobRepository,
{
    async fn add(&self, user_id: &UserId, job_id: &JobId) -> Result<FavoriteChange, Error> {
        let inserted = self
            .favorites
            .add(user_id, job_id)
            .await
            .map_err(map_favorites_error)?;
        debug!(%user_id, %job_id, inserted, "favorite added");
        Ok(FavoriteChange::from_changed(inserted))
    }

    async fn remove(&self, user_id: &UserId, job_id: &JobId) -> Result<FavoriteChange, Error> {
        let removed = self
            .favorites
            .remove(user_id, job_id)
            .await
            .map_err(map_favorites_error)?;
        debug!(%user_id, %job_id, removed, "favorite removed");
        Ok(FavoriteChange::from_changed(removed))
    }
}

#[async_trait]
impl<F, J> FavoritesQuery for FavoritesService<F, J>
where
    F: FavoritesRepository,
    J: JobRepository,
{
    async fn list(&self, user_id: &UserId) -> Result<Vec<Job>, Error> {
        let ids = self
            .favorites
            .list(user_id)
            .await
            .map_err(map_favorites_error)?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut jobs: HashMap<JobId, Job> = self
            .jobs
            .find_many(&ids)
            .await
            .map_err(map_job_error)?
            .into_iter()
            .map(|job| (job.id, job))
            .collect();
        Ok(ids.iter().filter_map(|id| jobs.remove(id)).collect())
    }
}
