//! Builders wiring outbound adapters into the HTTP state.

use std::io;
use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::warn;

use jobboard::domain::ports::{
    ApplicationRepository, FavoritesRepository, JobRepository, UserRepository,
};
use jobboard::domain::{
    ApplicationService, AuthorizationGate, FavoritesService, IdentityService, SignupPolicy,
};
use jobboard::inbound::http::state::{HttpState, HttpStatePorts};
use jobboard::outbound::memory::InMemoryStore;
use jobboard::outbound::persistence::{
    DieselApplicationRepository, DieselFavoritesRepository, DieselJobRepository,
    DieselUserRepository,
};
use jobboard::outbound::security::{Argon2PasswordHasher, JwtTokenService};
use jobboard::outbound::storage::FsResumeStore;

use super::ServerConfig;

/// Adapters shared by every repository backend.
struct SharedAdapters {
    tokens: Arc<JwtTokenService>,
    hasher: Arc<Argon2PasswordHasher>,
    resumes: Arc<FsResumeStore>,
    clock: Arc<dyn Clock>,
    signup: SignupPolicy,
}

/// One handle per repository port.
struct Repositories<U, J, A, F> {
    users: Arc<U>,
    jobs: Arc<J>,
    applications: Arc<A>,
    favorites: Arc<F>,
}

fn wire_ports<U, J, A, F>(repos: Repositories<U, J, A, F>, shared: SharedAdapters) -> HttpStatePorts
where
    U: UserRepository + 'static,
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    F: FavoritesRepository + 'static,
{
    let Repositories {
        users,
        jobs,
        applications,
        favorites,
    } = repos;
    let identity = IdentityService::new(
        Arc::clone(&users),
        shared.hasher,
        Arc::clone(&shared.tokens),
        Arc::clone(&shared.clock),
        shared.signup,
    );
    let gate = AuthorizationGate::new(Arc::clone(&users), shared.tokens);
    let application_service = Arc::new(ApplicationService::new(
        applications,
        Arc::clone(&jobs),
        users,
        shared.clock,
    ));
    let favorites_service = Arc::new(FavoritesService::new(favorites, jobs));

    HttpStatePorts {
        identity: Arc::new(identity),
        gate: Arc::new(gate),
        applications: application_service.clone(),
        applications_query: application_service,
        favorites: favorites_service.clone(),
        favorites_query: favorites_service,
        resumes: shared.resumes,
    }
}

/// Build the handler state from the server configuration.
///
/// Uses the PostgreSQL repositories when a pool is configured and the
/// in-memory store otherwise.
///
/// # Errors
/// Returns [`io::Error`] when the resume directory cannot be opened.
pub(super) fn build_http_state(config: &ServerConfig) -> io::Result<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let resumes = FsResumeStore::open(&config.resume_dir).map_err(|err| {
        io::Error::other(format!(
            "failed to open resume directory {}: {err}",
            config.resume_dir.display()
        ))
    })?;
    let shared = SharedAdapters {
        tokens: Arc::new(JwtTokenService::new(
            &config.token_key,
            config.token_ttl,
            Arc::clone(&clock),
        )),
        hasher: Arc::new(Argon2PasswordHasher::new()),
        resumes: Arc::new(resumes),
        clock,
        signup: config.signup,
    };

    let ports = match &config.db_pool {
        Some(pool) => wire_ports(
            Repositories {
                users: Arc::new(DieselUserRepository::new(pool.clone())),
                jobs: Arc::new(DieselJobRepository::new(pool.clone())),
                applications: Arc::new(DieselApplicationRepository::new(pool.clone())),
                favorites: Arc::new(DieselFavoritesRepository::new(pool.clone())),
            },
            shared,
        ),
        None => {
            warn!("no database configured; using the in-memory store, data is lost on restart");
            let store = Arc::new(InMemoryStore::new());
            wire_ports(
                Repositories {
                    users: Arc::clone(&store),
                    jobs: Arc::clone(&store),
                    applications: Arc::clone(&store),
                    favorites: store,
                },
                shared,
            )
        }
    };

    Ok(HttpState::new(ports, config.limits))
}
