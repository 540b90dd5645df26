//! HTTP mapping for domain errors.
//!
//! The domain error stays transport agnostic; this module assigns status
//! codes, redacts internal messages and echoes the trace id header.

use actix_web::{HttpRequest, HttpResponse, ResponseError, error::JsonPayloadError, http::StatusCode};
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

pub use crate::domain::ApiResult;

/// Reason code attached to 413 responses for oversized uploads.
pub const RESUME_TOO_LARGE: &str = "resume_too_large";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        let mut redacted = Error::internal("Internal server error");
        if let Some(id) = error.trace_id() {
            redacted = redacted.with_trace_id(id.to_owned());
        }
        redacted
    } else {
        error.clone()
    }
}

fn json_response(status: StatusCode, body: &Error) -> HttpResponse {
    let mut builder = HttpResponse::build(status);
    if let Some(id) = body.trace_id() {
        builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
    }
    builder.json(body)
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        if matches!(self.code(), ErrorCode::InternalError) {
            error!(message = self.message(), trace_id = ?self.trace_id(), "request failed");
        }
        json_response(self.status_code(), &redact_if_internal(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

/// Upload exceeded the configured size limit (HTTP 413).
///
/// The body uses the standard error payload with code `invalid_request` and
/// reason [`RESUME_TOO_LARGE`].
#[derive(Debug)]
pub struct PayloadTooLarge {
    body: Error,
}

impl PayloadTooLarge {
    /// Rejection for a body exceeding `limit_bytes`.
    pub fn new(limit_bytes: usize) -> Self {
        let body = Error::invalid_request(format!("resume exceeds {limit_bytes} bytes"))
            .with_details(serde_json::json!({
                "code": RESUME_TOO_LARGE,
                "limitBytes": limit_bytes,
            }));
        Self { body }
    }
}

impl std::fmt::Display for PayloadTooLarge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.body.message())
    }
}

impl ResponseError for PayloadTooLarge {
    fn status_code(&self) -> StatusCode {
        StatusCode::PAYLOAD_TOO_LARGE
    }

    fn error_response(&self) -> HttpResponse {
        json_response(self.status_code(), &self.body)
    }
}

/// Turn malformed JSON bodies into `invalid_request` errors.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request(format!("invalid JSON body: {err}")).into()
}
