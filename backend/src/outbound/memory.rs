//! In-memory adapter for every repository port.
//!
//! Used for local development without a database and by tests. All state
//! sits behind one mutex, and each port method takes the lock once, so each
//! call behaves like a single storage statement. The same constraints as the
//! PostgreSQL schema are enforced:
//!
//! - unique user email;
//! - unique `(job_id, user_id)` per application, with the job required to
//!   exist;
//! - `(user_id, job_id)` favorites keyed by the pair, with the job required
//!   to exist.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    ApplicationRepository, ApplicationRepositoryError, FavoritesRepository,
    FavoritesRepositoryError, JobRepository, JobRepositoryError, UserPersistenceError,
    UserRepository,
};
use crate::domain::{Application, EmailAddress, Job, JobId, User, UserId};

#[derive(Default)]
struct State {
    users: HashMap<UserId, User>,
    emails: HashMap<EmailAddress, UserId>,
    jobs: HashMap<JobId, Job>,
    applications: Vec<Application>,
    favorites: BTreeMap<(UserId, JobId), Favorite>,
    sequence: u64,
}

struct Favorite {
    added: u64,
}

impl State {
    fn next_sequence(&mut self) -> u64 {
        self.sequence += 1;
        self.sequence
    }
}

/// Process-local store implementing the repository ports.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a catalogue job.
    pub fn insert_job(&self, job: Job) {
        if let Ok(mut state) = self.state.lock() {
            state.jobs.insert(job.id, job);
        }
    }

    /// Remove a catalogue job together with its applications and favorites,
    /// mirroring the cascading foreign keys.
    pub fn remove_job(&self, job_id: &JobId) {
        if let Ok(mut state) = self.state.lock() {
            state.jobs.remove(job_id);
            state
                .applications
                .retain(|application| application.job_id != *job_id);
            state.favorites.retain(|(_, favorite_job), _| favorite_job != job_id);
        }
    }

    /// Number of stored applications.
    pub fn application_count(&self) -> usize {
        self.state
            .lock()
            .map(|state| state.applications.len())
            .unwrap_or_default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, String> {
        self.state
            .lock()
            .map_err(|_| "in-memory store lock poisoned".to_owned())
    }
}

fn newest_first(applications: &mut [Application]) {
    applications.sort_by(|a, b| b.applied_at.cmp(&a.applied_at));
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut state = self.lock().map_err(UserPersistenceError::query)?;
        if state.emails.contains_key(&user.email) {
            return Err(UserPersistenceError::duplicate_email(user.email.as_ref()));
        }
        state.emails.insert(user.email.clone(), user.id);
        state.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::query)?;
        Ok(state.users.get(id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::query)?;
        Ok(state
            .emails
            .get(email)
            .and_then(|id| state.users.get(id))
            .cloned())
    }

    async fn find_many(&self, ids: &[UserId]) -> Result<Vec<User>, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::query)?;
        Ok(ids
            .iter()
            .filter_map(|id| state.users.get(id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl JobRepository for InMemoryStore {
    async fn find_by_id(&self, id: &JobId) -> Result<Option<Job>, JobRepositoryError> {
        let state = self.lock().map_err(JobRepositoryError::query)?;
        Ok(state.jobs.get(id).cloned())
    }

    async fn find_many(&self, ids: &[JobId]) -> Result<Vec<Job>, JobRepositoryError> {
        let state = self.lock().map_err(JobRepositoryError::query)?;
        Ok(ids
            .iter()
            .filter_map(|id| state.jobs.get(id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ApplicationRepository for InMemoryStore {
    async fn insert(&self, application: &Application) -> Result<(), ApplicationRepositoryError> {
        let mut state = self.lock().map_err(ApplicationRepositoryError::query)?;
        if !state.jobs.contains_key(&application.job_id) {
            return Err(ApplicationRepositoryError::UnknownJob);
        }
        let duplicate = state.applications.iter().any(|existing| {
            existing.job_id == application.job_id && existing.user_id == application.user_id
        });
        if duplicate {
            return Err(ApplicationRepositoryError::Duplicate);
        }
        state.applications.push(application.clone());
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Application>, ApplicationRepositoryError> {
        let state = self.lock().map_err(ApplicationRepositoryError::query)?;
        let mut applications: Vec<_> = state
            .applications
            .iter()
            .filter(|application| application.user_id == *user_id)
            .cloned()
            .collect();
        newest_first(&mut applications);
        Ok(applications)
    }

    async fn list_all(&self) -> Result<Vec<Application>, ApplicationRepositoryError> {
        let state = self.lock().map_err(ApplicationRepositoryError::query)?;
        let mut applications = state.applications.clone();
        newest_first(&mut applications);
        Ok(applications)
    }
}

#[async_trait]
impl FavoritesRepository for InMemoryStore {
    async fn add(&self, user_id: &UserId, job_id: &JobId) -> Result<bool, FavoritesRepositoryError> {
        let mut state = self.lock().map_err(FavoritesRepositoryError::query)?;
        if !state.jobs.contains_key(job_id) {
            return Err(FavoritesRepositoryError::UnknownJob);
        }
        if state.favorites.contains_key(&(*user_id, *job_id)) {
            return Ok(false);
        }
        let added = state.next_sequence();
        state.favorites.insert((*user_id, *job_id), Favorite { added });
        Ok(true)
    }

    async fn remove(
        &self,
        user_id: &UserId,
        job_id: &JobId,
    ) -> Result<bool, FavoritesRepositoryError> {
        let mut state = self.lock().map_err(FavoritesRepositoryError::query)?;
        Ok(state.favorites.remove(&(*user_id, *job_id)).is_some())
    }

    async fn list(&self, user_id: &UserId) -> Result<Vec<JobId>, FavoritesRepositoryError> {
        let state = self.lock().map_err(FavoritesRepositoryError::query)?;
        let mut entries: Vec<(u64, JobId)> = state
            .favorites
            .range((*user_id, JobId::from(uuid::Uuid::nil()))..)
            .take_while(|((owner, _), _)| owner == user_id)
            .map(|((_, job_id), favorite)| (favorite.added, *job_id))
            .collect();
        entries.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(entries.into_iter().map(|(_, job_id)| job_id).collect())
    }
}
