//! Job records as seen by the workflows.
//!
//! Jobs belong to the catalogue; the core reads them to check existence and
//! to expand application and favorite listings.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::identifier::define_identifier;

define_identifier!(
    /// Stable job identifier stored as a UUID.
    JobId,
    "job id"
);

/// Employment type advertised by a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum JobType {
    #[serde(rename = "Full-Time")]
    FullTime,
    #[serde(rename = "Part-Time")]
    PartTime,
    #[serde(rename = "Contract")]
    Contract,
}

/// Error raised when a stored job type is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown job type: {0}")]
pub struct UnknownJobType(pub String);

impl JobType {
    /// Display and storage label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FullTime => "Full-Time",
            Self::PartTime => "Part-Time",
            Self::Contract => "Contract",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobType {
    type Err = UnknownJobType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Full-Time" => Ok(Self::FullTime),
            "Part-Time" => Ok(Self::PartTime),
            "Contract" => Ok(Self::Contract),
            other => Err(UnknownJobType(other.to_owned())),
        }
    }
}

/// Job posting display fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    #[schema(value_type = String, example = "6f1c1f0e-2d1c-4b7a-9a53-0a9f0c2d1e11")]
    pub id: JobId,
    pub title: String,
    pub description: String,
    pub location: String,
    #[serde(rename = "type")]
    pub job_type: JobType,
    pub company: String,
    pub posted_at: DateTime<Utc>,
}
