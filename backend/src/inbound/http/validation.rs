//! Shared validation helpers for inbound HTTP adapters.
//!
//! Validation failures become `invalid_request` errors whose `details` name
//! the offending field and a machine-readable code.

use serde_json::json;

use crate::domain::{
    ApplicationValidationError, CredentialValidationError, Error, JobId, UserValidationError,
};

/// Validation error codes reported in `details.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    MissingField,
    InvalidUuid,
    InvalidValue,
    TooLong,
}

impl ValidationCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidUuid => "invalid_uuid",
            Self::InvalidValue => "invalid_value",
            Self::TooLong => "too_long",
        }
    }
}

/// HTTP-facing field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) fn field_error(field: FieldName, code: ValidationCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    field_error(
        field,
        ValidationCode::MissingField,
        format!("missing required field: {}", field.as_str()),
    )
}

/// Parse a job id path segment.
pub(crate) fn parse_job_id(raw: &str) -> Result<JobId, Error> {
    JobId::new(raw).map_err(|_| {
        Error::invalid_request("job id must be a valid UUID").with_details(json!({
            "field": "jobId",
            "value": raw,
            "code": ValidationCode::InvalidUuid.as_str(),
        }))
    })
}

pub(crate) fn map_user_validation_error(err: UserValidationError) -> Error {
    let message = err.to_string();
    match err {
        UserValidationError::EmptyEmail => missing_field_error(FieldName::new("email")),
        UserValidationError::InvalidEmail => {
            field_error(FieldName::new("email"), ValidationCode::InvalidValue, message)
        }
        UserValidationError::EmailTooLong { .. } => {
            field_error(FieldName::new("email"), ValidationCode::TooLong, message)
        }
        UserValidationError::EmptyName { field } => missing_field_error(FieldName::new(field)),
        UserValidationError::NameTooLong { field, .. } => {
            field_error(FieldName::new(field), ValidationCode::TooLong, message)
        }
        UserValidationError::UnknownRole { .. } => {
            field_error(FieldName::new("role"), ValidationCode::InvalidValue, message)
        }
    }
}

pub(crate) fn map_credential_error(err: CredentialValidationError) -> Error {
    match err {
        CredentialValidationError::Field(inner) => map_user_validation_error(inner),
        CredentialValidationError::EmptyPassword => missing_field_error(FieldName::new("password")),
        CredentialValidationError::PasswordTooLong { .. } => field_error(
            FieldName::new("password"),
            ValidationCode::TooLong,
            err.to_string(),
        ),
    }
}

pub(crate) fn map_application_validation_error(err: ApplicationValidationError) -> Error {
    let message = err.to_string();
    match err {
        ApplicationValidationError::MessageTooLong { .. } => {
            field_error(FieldName::new("message"), ValidationCode::TooLong, message)
        }
        ApplicationValidationError::EmptyResumeRef
        | ApplicationValidationError::ResumeRefTooLong { .. } => {
            field_error(FieldName::new("resume"), ValidationCode::InvalidValue, message)
        }
        ApplicationValidationError::UnknownStatus { .. } => {
            field_error(FieldName::new("status"), ValidationCode::InvalidValue, message)
        }
    }
}
