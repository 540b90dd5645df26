//! Liveness and readiness probes.
//!
//! Readiness flips once the store and resume directory are wired; liveness
//! drops when the server starts draining so orchestrators stop routing to it.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, get, http::header, web};
use serde::Serialize;
use utoipa::ToSchema;

/// Probe flags shared between the server bootstrap and the probe handlers.
#[derive(Debug)]
pub struct HealthState {
    ready: AtomicBool,
    live: AtomicBool,
    backend: &'static str,
}

impl HealthState {
    /// Starts live but not ready. `backend` names the configured job store.
    pub fn new(backend: &'static str) -> Self {
        Self {
            ready: AtomicBool::new(false),
            live: AtomicBool::new(true),
            backend,
        }
    }

    /// Flip readiness once dependencies are wired.
    ///
    /// ```
    /// use jobboard::inbound::http::health::HealthState;
    ///
    /// let health = HealthState::new("memory");
    /// assert!(!health.is_ready());
    /// health.mark_ready();
    /// assert!(health.is_ready() && health.is_alive());
    /// ```
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Fail liveness from now on; call before graceful shutdown.
    pub fn mark_draining(&self) {
        self.live.store(false, Ordering::Release);
    }

    /// Whether `/health/ready` answers 200.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    fn respond(&self, ok: bool) -> HttpResponse {
        let body = ProbeReport {
            status: if ok { "ok" } else { "unavailable" },
            backend: self.backend,
        };
        let mut response = if ok {
            HttpResponse::Ok()
        } else {
            HttpResponse::ServiceUnavailable()
        };
        response
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .json(body)
    }
}

/// Probe response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProbeReport {
    pub status: &'static str,
    /// Job store backing this process: `postgres` or `memory`.
    pub backend: &'static str,
}

/// Readiness probe.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Ready to serve traffic", body = ProbeReport),
        (status = 503, description = "Still starting", body = ProbeReport)
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    state.respond(state.is_ready())
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Process is alive", body = ProbeReport),
        (status = 503, description = "Draining for shutdown", body = ProbeReport)
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    state.respond(state.is_alive())
}
