//! Job application handlers.
//!
//! ```text
//! POST /api/v1/applications/{jobId}         multipart: resume (file), message (optional text)
//! GET  /api/v1/applications/my-applications
//! GET  /api/v1/applications
//! ```

use actix_multipart::{Field, Multipart};
use actix_web::http::header::{CONTENT_DISPOSITION, ContentDisposition};
use actix_web::{HttpRequest, HttpResponse, get, post, web};
use futures_util::StreamExt;
use tracing::warn;

use crate::domain::ports::{ResumeStoreError, ResumeUpload};
use crate::domain::{
    APPLICATION_MESSAGE_MAX, Application, ApplicationSubmission, ApplicationView, Error, RoleSet,
    normalise_message,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::authorize;
use crate::inbound::http::error::PayloadTooLarge;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, ValidationCode, field_error, map_application_validation_error,
    missing_field_error, parse_job_id,
};

const RESUME_FIELD: &str = "resume";
const MESSAGE_FIELD: &str = "message";
// UTF-8 allows up to four bytes per character.
const MESSAGE_MAX_BYTES: usize = APPLICATION_MESSAGE_MAX * 4;

#[derive(Debug, Default)]
struct ApplicationForm {
    resume: Option<ResumeUpload>,
    message: Option<String>,
}

fn disposition(field: &Field) -> Option<ContentDisposition> {
    field
        .headers()
        .get(CONTENT_DISPOSITION)
        .and_then(|value| ContentDisposition::from_raw(value).ok())
}

fn malformed(err: impl std::fmt::Display) -> Error {
    Error::invalid_request(format!("invalid multipart body: {err}"))
}

/// Drain a field into memory, failing once it exceeds `limit` bytes.
async fn read_limited(field: &mut Field, limit: usize) -> Result<Option<Vec<u8>>, Error> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(malformed)?;
        if bytes.len() + chunk.len() > limit {
            return Ok(None);
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(Some(bytes))
}

async fn read_application_form(
    mut payload: Multipart,
    max_resume_bytes: usize,
) -> Result<ApplicationForm, actix_web::Error> {
    let mut form = ApplicationForm::default();
    while let Some(item) = payload.next().await {
        let mut field = item.map_err(malformed)?;
        let Some(disposition) = disposition(&field) else {
            continue;
        };
        match disposition.get_name() {
            Some(RESUME_FIELD) => {
                let file_name = disposition.get_filename().map(str::to_owned);
                let bytes = read_limited(&mut field, max_resume_bytes)
                    .await?
                    .ok_or_else(|| PayloadTooLarge::new(max_resume_bytes))?;
                form.resume = Some(ResumeUpload { file_name, bytes });
            }
            Some(MESSAGE_FIELD) => {
                let bytes = read_limited(&mut field, MESSAGE_MAX_BYTES)
                    .await?
                    .ok_or_else(|| {
                        field_error(
                            FieldName::new(MESSAGE_FIELD),
                            ValidationCode::TooLong,
                            format!("message must be at most {APPLICATION_MESSAGE_MAX} characters"),
                        )
                    })?;
                let text = String::from_utf8(bytes).map_err(|_| {
                    field_error(
                        FieldName::new(MESSAGE_FIELD),
                        ValidationCode::InvalidValue,
                        "message must be UTF-8 text",
                    )
                })?;
                form.message = Some(text);
            }
            _ => {
                // Unknown parts are drained and ignored.
                while let Some(chunk) = field.next().await {
                    chunk.map_err(malformed)?;
                }
            }
        }
    }
    Ok(form)
}

fn map_resume_store_error(err: ResumeStoreError) -> Error {
    match err {
        ResumeStoreError::Rejected { message } => {
            field_error(FieldName::new(RESUME_FIELD), ValidationCode::InvalidValue, message)
        }
        ResumeStoreError::Io { message } => {
            Error::internal(format!("resume storage failed: {message}"))
        }
    }
}

/// Apply to a job with a resume upload. Students only.
#[utoipa::path(
    post,
    path = "/api/v1/applications/{jobId}",
    params(("jobId" = String, Path, description = "Job identifier (UUID)")),
    request_body(
        content_type = "multipart/form-data",
        description = "`resume` file part and optional `message` text part"
    ),
    responses(
        (status = 201, description = "Application recorded", body = Application),
        (status = 400, description = "Invalid request or already applied", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Caller is not a student", body = ErrorSchema),
        (status = 404, description = "Job not found", body = ErrorSchema),
        (status = 413, description = "Resume too large", body = ErrorSchema)
    ),
    tags = ["applications"],
    operation_id = "submitApplication"
)]
#[post("/applications/{job_id}")]
pub async fn submit_application(
    state: web::Data<HttpState>,
    req: HttpRequest,
    path: web::Path<String>,
    payload: Multipart,
) -> Result<HttpResponse, actix_web::Error> {
    let principal = authorize(&state, &req, RoleSet::STUDENTS).await?;
    let job_id = parse_job_id(&path)?;
    let form = read_application_form(payload, state.limits.max_resume_bytes).await?;
    let message =
        normalise_message(form.message.as_deref()).map_err(map_application_validation_error)?;
    let upload = form
        .resume
        .ok_or_else(|| missing_field_error(FieldName::new(RESUME_FIELD)))?;

    let resume_ref = state
        .resumes
        .store(upload)
        .await
        .map_err(map_resume_store_error)?;
    let submission = ApplicationSubmission {
        job_id,
        user_id: principal.user_id(),
        resume_ref: resume_ref.clone(),
        message,
    };
    match state.applications.submit(submission).await {
        Ok(application) => Ok(HttpResponse::Created().json(application)),
        Err(err) => {
            if let Err(discard_err) = state.resumes.discard(&resume_ref).await {
                warn!(error = %discard_err, "failed to discard orphaned resume");
            }
            Err(err.into())
        }
    }
}

/// The caller's own applications, most recent first. Students only.
#[utoipa::path(
    get,
    path = "/api/v1/applications/my-applications",
    responses(
        (status = 200, description = "Applications with job details", body = [ApplicationView]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Caller is not a student", body = ErrorSchema)
    ),
    tags = ["applications"],
    operation_id = "listMyApplications"
)]
#[get("/applications/my-applications")]
pub async fn list_my_applications(
    state: web::Data<HttpState>,
    req: HttpRequest,
) -> ApiResult<web::Json<Vec<ApplicationView>>> {
    let principal = authorize(&state, &req, RoleSet::STUDENTS).await?;
    let views = state
        .applications_query
        .list_for_user(&principal.user_id())
        .await?;
    Ok(web::Json(views))
}

/// Every application with job and applicant details. Admins only.
#[utoipa::path(
    get,
    path = "/api/v1/applications",
    responses(
        (status = 200, description = "All applications", body = [ApplicationView]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Caller is not an admin", body = ErrorSchema)
    ),
    tags = ["applications"],
    operation_id = "listApplications"
)]
#[get("/applications")]
pub async fn list_applications(
    state: web::Data<HttpState>,
    req: HttpRequest,
) -> ApiResult<web::Json<Vec<ApplicationView>>> {
    authorize(&state, &req, RoleSet::ADMINS).await?;
    let views = state.applications_query.list_all().await?;
    Ok(web::Json(views))
}

#[cfg(test)]
#[path = "applications_tests.rs"]
mod tests;
