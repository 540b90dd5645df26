//! Application submission and listings.
//!
//! Submission relies on the repository's `(job_id, user_id)` unique
//! constraint as the single source of truth: there is no read-then-write
//! duplicate check, so concurrent submissions for one pair resolve to exactly
//! one stored row and `already_applied` for the rest.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::error::reason;
use crate::domain::ports::{
    ApplicationCommand, ApplicationQuery, ApplicationRepository, ApplicationRepositoryError,
    JobRepository, JobRepositoryError, UserPersistenceError, UserRepository,
};
use crate::domain::{
    ApplicantSummary, Application, ApplicationId, ApplicationStatus, ApplicationSubmission,
    ApplicationView, Error, Job, JobId, User, UserId,
};

/// Application workflow implementing the application driving ports.
#[derive(Clone)]
pub struct ApplicationService<A, J, U> {
    applications: Arc<A>,
    jobs: Arc<J>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<A, J, U> ApplicationService<A, J, U> {
    /// Create the service. `clock` stamps `applied_at`.
    pub fn new(applications: Arc<A>, jobs: Arc<J>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            applications,
            jobs,
            users,
            clock,
        }
    }
}

pub(crate) fn job_not_found() -> Error {
    Error::not_found("job not found").with_reason(reason::JOB_NOT_FOUND)
}

/// The principal's account vanished after the gate resolved it.
pub(crate) fn user_not_found() -> Error {
    Error::unauthorized("user not found").with_reason(reason::USER_NOT_FOUND)
}

fn already_applied() -> Error {
    Error::invalid_request("already applied to this job").with_reason(reason::ALREADY_APPLIED)
}

fn map_application_error(error: ApplicationRepositoryError) -> Error {
    match error {
        ApplicationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("application repository unavailable: {message}"))
        }
        ApplicationRepositoryError::Query { message } => {
            Error::internal(format!("application repository error: {message}"))
        }
        ApplicationRepositoryError::Duplicate => already_applied(),
        ApplicationRepositoryError::UnknownJob => job_not_found(),
        ApplicationRepositoryError::UnknownUser => user_not_found(),
    }
}

pub(crate) fn map_job_error(error: JobRepositoryError) -> Error {
    match error {
        JobRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("job repository unavailable: {message}"))
        }
        JobRepositoryError::Query { message } => {
            Error::internal(format!("job repository error: {message}"))
        }
    }
}

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        other => Error::internal(format!("user repository error: {other}")),
    }
}

fn distinct<T: Copy + Ord>(ids: impl Iterator<Item = T>) -> Vec<T> {
    let mut ids: Vec<T> = ids.collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

impl<A, J, U> ApplicationService<A, J, U>
where
    A: ApplicationRepository,
    J: JobRepository,
    U: UserRepository,
{
    async fn load_jobs(&self, applications: &[Application]) -> Result<HashMap<JobId, Job>, Error> {
        let ids = distinct(applications.iter().map(|application| application.job_id));
        let jobs = self.jobs.find_many(&ids).await.map_err(map_job_error)?;
        Ok(jobs.into_iter().map(|job| (job.id, job)).collect())
    }

    async fn load_applicants(
        &self,
        applications: &[Application],
    ) -> Result<HashMap<UserId, User>, Error> {
        let ids = distinct(applications.iter().map(|application| application.user_id));
        let users = self.users.find_many(&ids).await.map_err(map_user_error)?;
        Ok(users.into_iter().map(|user| (user.id, user)).collect())
    }

    fn expand(
        applications: Vec<Application>,
        jobs: &HashMap<JobId, Job>,
        applicants: Option<&HashMap<UserId, User>>,
    ) -> Vec<ApplicationView> {
        applications
            .into_iter()
            .filter_map(|application| {
                let Some(job) = jobs.get(&application.job_id).cloned() else {
                    warn!(application_id = %application.id, job_id = %application.job_id, "application references a missing job");
                    return None;
                };
                let applicant = applicants
                    .and_then(|users| users.get(&application.user_id))
                    .map(|user| ApplicantSummary {
                        first_name: user.first_name.clone(),
                        last_name: user.last_name.clone(),
                        email: user.email.clone(),
                    });
                Some(ApplicationView {
                    application,
                    job,
                    applicant,
                })
            })
            .collect()
    }
}

#[async_trait]
impl<A, J, U> ApplicationCommand for ApplicationService<A, J, U>
where
    A: ApplicationRepository,
    J: JobRepository,
    U: UserRepository,
{
    async fn submit(&self, submission: ApplicationSubmission) -> Result<Application, Error> {
        let ApplicationSubmission {
            job_id,
            user_id,
            resume_ref,
            message,
        } = submission;

        if self
            .jobs
            .find_by_id(&job_id)
            .await
            .map_err(map_job_error)?
            .is_none()
        {
            return Err(job_not_found());
        }

        let application = Application {
            id: ApplicationId::random(),
            job_id,
            user_id,
            resume_ref,
            message,
            status: ApplicationStatus::Pending,
            applied_at: self.clock.utc(),
        };

        self.applications
            .insert(&application)
            .await
            .map_err(map_application_error)?;
        info!(application_id = %application.id, %job_id, %user_id, "application submitted");
        Ok(application)
    }
}

#[async_trait]
impl<A, J, U> ApplicationQuery for ApplicationService<A, J, U>
where
    A: ApplicationRepository,
    J: JobRepository,
    U: UserRepository,
{
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<ApplicationView>, Error> {
        let applications = self
            .applications
            .list_for_user(user_id)
            .await
            .map_err(map_application_error)?;
        let jobs = self.load_jobs(&applications).await?;
        Ok(Self::expand(applications, &jobs, None))
    }

    async fn list_all(&self) -> Result<Vec<ApplicationView>, Error> {
        let applications = self
            .applications
            .list_all()
            .await
            .map_err(map_application_error)?;
        let jobs = self.load_jobs(&applications).await?;
        let applicants = self.load_applicants(&applications).await?;
        Ok(Self::expand(applications, &jobs, Some(&applicants)))
    }
}

#[cfg(test)]
#[path = "application_service_tests.rs"]
mod tests;
