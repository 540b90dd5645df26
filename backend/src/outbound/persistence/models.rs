//! Internal Diesel row structs.
//!
//! Rows never leave the persistence layer; repositories convert them into
//! domain values (and reject rows that violate domain invariants).

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Application, ApplicationStatus, EmailAddress, Job, JobType, PasswordHash, PersonName,
    ResumeRef, User,
};

use super::schema::{applications, jobs, user_favorites, users};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = String;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let invalid = |field: &str, err: &dyn std::fmt::Display| {
            format!("user {} has invalid {field}: {err}", row.id)
        };
        Ok(Self {
            id: row.id.into(),
            email: EmailAddress::new(&row.email).map_err(|err| invalid("email", &err))?,
            password_hash: PasswordHash::new(row.password_hash.clone()),
            role: row.role.parse().map_err(|err| invalid("role", &err))?,
            first_name: PersonName::new(&row.first_name, "firstName")
                .map_err(|err| invalid("first_name", &err))?,
            last_name: PersonName::new(&row.last_name, "lastName")
                .map_err(|err| invalid("last_name", &err))?,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub created_at: DateTime<Utc>,
}

impl<'a> From<&'a User> for NewUserRow<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            id: *user.id.as_uuid(),
            email: user.email.as_ref(),
            password_hash: user.password_hash.as_str(),
            role: user.role.as_str(),
            first_name: user.first_name.as_ref(),
            last_name: user.last_name.as_ref(),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = jobs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct JobRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub job_type: String,
    pub company: String,
    pub posted_at: DateTime<Utc>,
}

impl TryFrom<JobRow> for Job {
    type Error = String;

    fn try_from(row: JobRow) -> Result<Self, Self::Error> {
        let job_type: JobType = row
            .job_type
            .parse()
            .map_err(|err| format!("job {} has invalid job_type: {err}", row.id))?;
        Ok(Self {
            id: row.id.into(),
            title: row.title,
            description: row.description,
            location: row.location,
            job_type,
            company: row.company,
            posted_at: row.posted_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = applications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ApplicationRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub user_id: Uuid,
    pub resume_ref: String,
    pub message: Option<String>,
    pub status: String,
    pub applied_at: DateTime<Utc>,
}

impl TryFrom<ApplicationRow> for Application {
    type Error = String;

    fn try_from(row: ApplicationRow) -> Result<Self, Self::Error> {
        let status: ApplicationStatus = row
            .status
            .parse()
            .map_err(|err| format!("application {} has invalid status: {err}", row.id))?;
        let resume_ref = ResumeRef::new(row.resume_ref)
            .map_err(|err| format!("application {} has invalid resume_ref: {err}", row.id))?;
        Ok(Self {
            id: row.id.into(),
            job_id: row.job_id.into(),
            user_id: row.user_id.into(),
            resume_ref,
            message: row.message,
            status,
            applied_at: row.applied_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = applications)]
pub(crate) struct NewApplicationRow<'a> {
    pub id: Uuid,
    pub job_id: Uuid,
    pub user_id: Uuid,
    pub resume_ref: &'a str,
    pub message: Option<&'a str>,
    pub status: &'a str,
    pub applied_at: DateTime<Utc>,
}

impl<'a> From<&'a Application> for NewApplicationRow<'a> {
    fn from(application: &'a Application) -> Self {
        Self {
            id: *application.id.as_uuid(),
            job_id: *application.job_id.as_uuid(),
            user_id: *application.user_id.as_uuid(),
            resume_ref: application.resume_ref.as_ref(),
            message: application.message.as_deref(),
            status: application.status.as_str(),
            applied_at: application.applied_at,
        }
    }
}

/// Insertable favorites row; `added_at` takes the column default.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_favorites)]
pub(crate) struct NewFavoriteRow {
    pub user_id: Uuid,
    pub job_id: Uuid,
}
