//! Tests for the application workflow.

use std::sync::Arc;

use chrono::Duration;
use futures::future::join_all;

use super::*;
use crate::domain::ports::{MockApplicationRepository, MockJobRepository, MockUserRepository};
use crate::domain::{ErrorCode, ResumeRef, Role};
use crate::outbound::memory::InMemoryStore;
use crate::test_support::clock::{MutableClock, fixture_clock, fixture_timestamp};
use crate::test_support::fixtures;

type MockService = ApplicationService<MockApplicationRepository, MockJobRepository, MockUserRepository>;

fn mock_service(
    applications: MockApplicationRepository,
    jobs: MockJobRepository,
    users: MockUserRepository,
) -> MockService {
    ApplicationService::new(
        Arc::new(applications),
        Arc::new(jobs),
        Arc::new(users),
        fixture_clock(),
    )
}

fn store_service(
    store: &Arc<InMemoryStore>,
) -> ApplicationService<InMemoryStore, InMemoryStore, InMemoryStore> {
    ApplicationService::new(
        Arc::clone(store),
        Arc::clone(store),
        Arc::clone(store),
        fixture_clock(),
    )
}

fn submission(job_id: JobId, user_id: UserId) -> ApplicationSubmission {
    ApplicationSubmission {
        job_id,
        user_id,
        resume_ref: ResumeRef::new("resumes/cv.pdf").expect("valid ref"),
        message: None,
    }
}

fn application_for(job: &Job, user_id: UserId, minutes_ago: i64) -> Application {
    Application {
        id: ApplicationId::random(),
        job_id: job.id,
        user_id,
        resume_ref: ResumeRef::new("resumes/cv.pdf").expect("valid ref"),
        message: None,
        status: ApplicationStatus::Pending,
        applied_at: fixture_timestamp() - Duration::minutes(minutes_ago),
    }
}

#[tokio::test]
async fn submit_records_pending_application_at_clock_time() {
    let job = fixtures::job("Backend Engineer");
    let job_id = job.id;
    let mut jobs = MockJobRepository::new();
    jobs.expect_find_by_id()
        .return_once(move |_| Ok(Some(job)));
    let mut applications = MockApplicationRepository::new();
    applications
        .expect_insert()
        .withf(|application| {
            application.status == ApplicationStatus::Pending
                && application.applied_at == fixture_timestamp()
        })
        .times(1)
        .return_once(|_| Ok(()));

    let service = mock_service(applications, jobs, MockUserRepository::new());
    let user_id = UserId::random();
    let application = service
        .submit(submission(job_id, user_id))
        .await
        .expect("submission succeeds");

    assert_eq!(application.job_id, job_id);
    assert_eq!(application.user_id, user_id);
    assert_eq!(application.status, ApplicationStatus::Pending);
}

#[tokio::test]
async fn submit_rejects_unknown_job_without_writing() {
    let mut jobs = MockJobRepository::new();
    jobs.expect_find_by_id().return_once(|_| Ok(None));
    let mut applications = MockApplicationRepository::new();
    applications.expect_insert().never();

    let service = mock_service(applications, jobs, MockUserRepository::new());
    let err = service
        .submit(submission(JobId::random(), UserId::random()))
        .await
        .expect_err("unknown job");

    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.reason(), Some(reason::JOB_NOT_FOUND));
}

#[tokio::test]
async fn submit_maps_constraint_violations() {
    let job = fixtures::job("Backend Engineer");
    let job_id = job.id;
    let mut jobs = MockJobRepository::new();
    jobs.expect_find_by_id()
        .times(2)
        .returning(move |_| Ok(Some(fixtures::job("Backend Engineer"))));
    let mut applications = MockApplicationRepository::new();
    let mut outcomes = vec![
        ApplicationRepositoryError::UnknownJob,
        ApplicationRepositoryError::Duplicate,
    ];
    applications
        .expect_insert()
        .times(2)
        .returning(move |_| Err(outcomes.pop().expect("queued outcome")));

    let service = mock_service(applications, jobs, MockUserRepository::new());
    let user_id = UserId::random();

    let duplicate = service
        .submit(submission(job_id, user_id))
        .await
        .expect_err("duplicate");
    assert_eq!(duplicate.code(), ErrorCode::InvalidRequest);
    assert_eq!(duplicate.reason(), Some(reason::ALREADY_APPLIED));

    let vanished = service
        .submit(submission(job_id, user_id))
        .await
        .expect_err("job deleted concurrently");
    assert_eq!(vanished.code(), ErrorCode::NotFound);
    assert_eq!(vanished.reason(), Some(reason::JOB_NOT_FOUND));
}

#[tokio::test]
async fn submit_for_a_deleted_user_is_unauthorized() {
    let job = fixtures::job("Backend Engineer");
    let job_id = job.id;
    let mut jobs = MockJobRepository::new();
    jobs.expect_find_by_id().return_once(move |_| Ok(Some(job)));
    let mut applications = MockApplicationRepository::new();
    applications
        .expect_insert()
        .return_once(|_| Err(ApplicationRepositoryError::UnknownUser));

    let service = mock_service(applications, jobs, MockUserRepository::new());
    let err = service
        .submit(submission(job_id, UserId::random()))
        .await
        .expect_err("user deleted before insert");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.reason(), Some(reason::USER_NOT_FOUND));
}

#[tokio::test]
async fn repeated_submission_leaves_a_single_row() {
    let store = Arc::new(InMemoryStore::new());
    let job = fixtures::job("Backend Engineer");
    store.insert_job(job.clone());
    let service = store_service(&store);
    let user_id = UserId::random();

    service
        .submit(submission(job.id, user_id))
        .await
        .expect("first submission");
    let err = service
        .submit(submission(job.id, user_id))
        .await
        .expect_err("second submission");

    assert_eq!(err.reason(), Some(reason::ALREADY_APPLIED));
    assert_eq!(store.application_count(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_submissions_admit_exactly_one() {
    let store = Arc::new(InMemoryStore::new());
    let job = fixtures::job("Backend Engineer");
    store.insert_job(job.clone());
    let service = Arc::new(store_service(&store));
    let user_id = UserId::random();

    let attempts = (0..16).map(|_| {
        let service = Arc::clone(&service);
        let job_id = job.id;
        tokio::spawn(async move { service.submit(submission(job_id, user_id)).await })
    });
    let results: Vec<_> = join_all(attempts)
        .await
        .into_iter()
        .map(|joined| joined.expect("task completes"))
        .collect();

    let successes = results.iter().filter(|result| result.is_ok()).count();
    let duplicates = results
        .iter()
        .filter(|result| {
            result
                .as_ref()
                .err()
                .is_some_and(|err| err.reason() == Some(reason::ALREADY_APPLIED))
        })
        .count();
    assert_eq!(successes, 1);
    assert_eq!(duplicates, 15);
    assert_eq!(store.application_count(), 1);
}

#[tokio::test]
async fn list_for_user_expands_jobs_most_recent_first() {
    let store = Arc::new(InMemoryStore::new());
    let clock = MutableClock::shared(fixture_timestamp());
    let service = ApplicationService::new(
        Arc::clone(&store),
        Arc::clone(&store),
        Arc::clone(&store),
        clock.clone(),
    );
    let first = fixtures::job("First");
    let second = fixtures::job("Second");
    store.insert_job(first.clone());
    store.insert_job(second.clone());
    let user_id = UserId::random();

    service
        .submit(submission(first.id, user_id))
        .await
        .expect("first");
    clock.advance_seconds(60);
    service
        .submit(submission(second.id, user_id))
        .await
        .expect("second");
    service
        .submit(submission(first.id, UserId::random()))
        .await
        .expect("other user");

    let views = service.list_for_user(&user_id).await.expect("listing");
    let titles: Vec<_> = views.iter().map(|view| view.job.title.as_str()).collect();
    assert_eq!(titles, ["Second", "First"]);
    assert!(views.iter().all(|view| view.applicant.is_none()));
}

#[tokio::test]
async fn list_all_batches_lookups_and_includes_applicants() {
    let job = fixtures::job("Backend Engineer");
    let applicant = fixtures::user("bob@x.com", Role::Student);
    let older = application_for(&job, applicant.id, 10);
    let newer = application_for(&job, applicant.id, 1);

    let mut applications = MockApplicationRepository::new();
    let listed = vec![newer.clone(), older.clone()];
    applications
        .expect_list_all()
        .return_once(move || Ok(listed));
    let mut jobs = MockJobRepository::new();
    let job_for_lookup = job.clone();
    jobs.expect_find_many()
        .withf(|ids| ids.len() == 1)
        .times(1)
        .return_once(move |_| Ok(vec![job_for_lookup]));
    let mut users = MockUserRepository::new();
    let applicant_for_lookup = applicant.clone();
    users
        .expect_find_many()
        .withf(|ids| ids.len() == 1)
        .times(1)
        .return_once(move |_| Ok(vec![applicant_for_lookup]));

    let service = mock_service(applications, jobs, users);
    let views = service.list_all().await.expect("listing");

    assert_eq!(views.len(), 2);
    assert_eq!(views[0].application.id, newer.id);
    let summary = views[0].applicant.as_ref().expect("applicant expanded");
    assert_eq!(summary.email.as_ref(), "bob@x.com");
    assert_eq!(views[1].job.id, job.id);
}

#[tokio::test]
async fn listing_reports_store_outage() {
    let mut applications = MockApplicationRepository::new();
    applications
        .expect_list_all()
        .return_once(|| Err(ApplicationRepositoryError::connection("refused")));

    let service = mock_service(
        applications,
        MockJobRepository::new(),
        MockUserRepository::new(),
    );
    let err = service.list_all().await.expect_err("store down");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}
