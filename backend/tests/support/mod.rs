//! Shared helpers for backend integration tests.
//!
//! Builds the full handler stack over the in-memory store with the real
//! Argon2, JWT and filesystem adapters.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use chrono::{TimeDelta, TimeZone, Utc};
use mockable::{Clock, DefaultClock};
use tempfile::TempDir;

use jobboard::Trace;
use jobboard::domain::{
    ApplicationService, AuthorizationGate, FavoritesService, IdentityService, Job, JobId, JobType,
    SignupPolicy,
};
use jobboard::inbound::http::error::json_error_handler;
use jobboard::inbound::http::routes;
use jobboard::inbound::http::state::{HttpState, HttpStatePorts, UploadLimits};
use jobboard::outbound::memory::InMemoryStore;
use jobboard::outbound::security::{Argon2PasswordHasher, JwtTokenService, TokenKey};
use jobboard::outbound::storage::FsResumeStore;

const BOUNDARY: &str = "jobboard-it-boundary";

/// In-memory backend plus the directory holding uploaded resumes.
pub struct Backend {
    pub store: Arc<InMemoryStore>,
    pub state: HttpState,
    pub resume_dir: TempDir,
}

impl Backend {
    pub fn new(limits: UploadLimits) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let resume_dir = tempfile::tempdir().expect("resume dir");
        let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
        let tokens = Arc::new(JwtTokenService::new(
            &TokenKey::ephemeral(),
            TimeDelta::hours(1),
            Arc::clone(&clock),
        ));
        let identity = IdentityService::new(
            Arc::clone(&store),
            Arc::new(Argon2PasswordHasher::new()),
            Arc::clone(&tokens),
            Arc::clone(&clock),
            SignupPolicy { allow_admin: true },
        );
        let gate = AuthorizationGate::new(Arc::clone(&store), tokens);
        let applications = Arc::new(ApplicationService::new(
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&store),
            clock,
        ));
        let favorites = Arc::new(FavoritesService::new(Arc::clone(&store), Arc::clone(&store)));
        let resumes = FsResumeStore::open(resume_dir.path()).expect("open resume store");

        let state = HttpState::new(
            HttpStatePorts {
                identity: Arc::new(identity),
                gate: Arc::new(gate),
                applications: applications.clone(),
                applications_query: applications,
                favorites: favorites.clone(),
                favorites_query: favorites,
                resumes: Arc::new(resumes),
            },
            limits,
        );
        Self {
            store,
            state,
            resume_dir,
        }
    }

    /// Add a catalogue job posted `days_ago` days before a fixed instant.
    pub fn add_job(&self, title: &str, days_ago: i64) -> JobId {
        let posted_at = Utc
            .with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp")
            - TimeDelta::days(days_ago);
        let job = Job {
            id: JobId::random(),
            title: title.to_owned(),
            description: format!("{title} role"),
            location: "Remote".to_owned(),
            job_type: JobType::FullTime,
            company: "Acme".to_owned(),
            posted_at,
        };
        let id = job.id;
        self.store.insert_job(job);
        id
    }

    /// Number of files currently held by the resume store.
    pub fn stored_resumes(&self) -> usize {
        std::fs::read_dir(self.resume_dir.path())
            .expect("read resume dir")
            .count()
    }

    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .app_data(web::Data::new(self.state.clone()))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .wrap(Trace)
            .service(web::scope("/api/v1").configure(routes::configure))
    }
}

/// Encoded `multipart/form-data` body and its content type.
pub fn multipart(parts: &[(&str, Option<&str>, &[u8])]) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    for (name, file_name, bytes) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        let headers = match file_name {
            Some(file) => format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file}\"\r\n\
                 Content-Type: application/pdf\r\n\r\n"
            ),
            None => format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"),
        };
        body.extend_from_slice(headers.as_bytes());
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}
