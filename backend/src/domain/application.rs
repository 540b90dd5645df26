//! Job applications and the views returned by application listings.
//!
//! ## Invariants
//! - At most one [`Application`] exists per `(job_id, user_id)` pair. Storage
//!   enforces this with a unique constraint; nothing in the domain checks it
//!   ahead of the insert.
//! - `applied_at` is set once at creation.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::identifier::define_identifier;
use super::{EmailAddress, Job, JobId, PersonName, UserId};

/// Maximum length of a resume reference.
pub const RESUME_REF_MAX: usize = 512;
/// Maximum length, in characters, of an application message.
pub const APPLICATION_MESSAGE_MAX: usize = 2000;

define_identifier!(
    /// Stable application identifier stored as a UUID.
    ApplicationId,
    "application id"
);

/// Validation errors for application inputs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApplicationValidationError {
    #[error("resume reference must not be empty")]
    EmptyResumeRef,
    #[error("resume reference must be at most {max} characters")]
    ResumeRefTooLong { max: usize },
    #[error("message must be at most {max} characters")]
    MessageTooLong { max: usize },
    #[error("unknown application status: {value}")]
    UnknownStatus { value: String },
}

/// Opaque reference to a stored resume. The core never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "resumes/0b7c.pdf")]
pub struct ResumeRef(String);

impl ResumeRef {
    /// Validate a stored-object reference: non-blank and bounded in length.
    pub fn new(raw: impl Into<String>) -> Result<Self, ApplicationValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(ApplicationValidationError::EmptyResumeRef);
        }
        if raw.chars().count() > RESUME_REF_MAX {
            return Err(ApplicationValidationError::ResumeRefTooLong {
                max: RESUME_REF_MAX,
            });
        }
        Ok(Self(raw))
    }
}

impl AsRef<str> for ResumeRef {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ResumeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ResumeRef> for String {
    fn from(value: ResumeRef) -> Self {
        value.0
    }
}

impl TryFrom<String> for ResumeRef {
    type Error = ApplicationValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Normalise an optional cover message: blank becomes `None`.
pub fn normalise_message(
    raw: Option<&str>,
) -> Result<Option<String>, ApplicationValidationError> {
    let Some(trimmed) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };
    if trimmed.chars().count() > APPLICATION_MESSAGE_MAX {
        return Err(ApplicationValidationError::MessageTooLong {
            max: APPLICATION_MESSAGE_MAX,
        });
    }
    Ok(Some(trimmed.to_owned()))
}

/// Review state of an application. The core only ever writes `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Reviewed,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Reviewed => "reviewed",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

impl FromStr for ApplicationStatus {
    type Err = ApplicationValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "reviewed" => Ok(Self::Reviewed),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            other => Err(ApplicationValidationError::UnknownStatus {
                value: other.to_owned(),
            }),
        }
    }
}

/// One user's submission for one job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[schema(value_type = String)]
    pub id: ApplicationId,
    #[schema(value_type = String)]
    pub job_id: JobId,
    #[schema(value_type = String)]
    pub user_id: UserId,
    pub resume_ref: ResumeRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
}

/// Submission request handed to the application workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationSubmission {
    pub job_id: JobId,
    pub user_id: UserId,
    pub resume_ref: ResumeRef,
    pub message: Option<String>,
}

/// Applicant fields shown to admins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantSummary {
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub email: EmailAddress,
}

/// Application expanded with its job and, for admin listings, the applicant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationView {
    #[serde(flatten)]
    pub application: Application,
    pub job: Job,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applicant: Option<ApplicantSummary>,
}
