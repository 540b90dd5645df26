//! Domain primitives, services and ports.
//!
//! Purpose: define the strongly typed entities shared by the HTTP and
//! persistence adapters and the services enforcing the job-board workflows.
//! Types document their invariants and serde contracts in their own Rustdoc.
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`]: transport-agnostic failure payload.
//! - [`User`], [`Job`], [`Application`]: stored entities.
//! - [`AuthorizationGate`], [`IdentityService`], [`ApplicationService`],
//!   [`FavoritesService`]: implementations of the driving ports.

pub mod application;
pub mod application_service;
pub mod auth;
pub mod authorization_gate;
pub mod error;
pub mod favorites_service;
pub mod identifier;
pub mod identity_service;
pub mod job;
pub mod ports;
pub mod trace_id;
pub mod user;

pub use self::application::{
    APPLICATION_MESSAGE_MAX, ApplicantSummary, Application, ApplicationId, ApplicationStatus,
    ApplicationSubmission, ApplicationValidationError, ApplicationView, ResumeRef,
    normalise_message,
};
pub use self::application_service::ApplicationService;
pub use self::auth::{
    BearerToken, CredentialValidationError, IssuedToken, LoginCredentials, LoginOutcome,
    PASSWORD_MAX_BYTES, Principal, Registration, RoleSet, TokenClaims,
};
pub use self::authorization_gate::AuthorizationGate;
pub use self::error::{Error, ErrorCode, ErrorValidationError, reason};
pub use self::favorites_service::FavoritesService;
pub use self::identifier::IdentifierError;
pub use self::identity_service::{IdentityService, SignupPolicy};
pub use self::job::{Job, JobId, JobType, UnknownJobType};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    EmailAddress, PasswordHash, PersonName, Role, User, UserId, UserProfile, UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use jobboard::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
