//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::http::header::AUTHORIZATION;

use crate::domain::{EmailAddress, PersonName, Principal, Role, UserId, UserProfile};
use crate::domain::ports::{
    MockAccessGate, MockApplicationCommand, MockApplicationQuery, MockFavoritesCommand,
    MockFavoritesQuery, MockIdentityCommand, MockResumeStore,
};

use super::state::{HttpState, HttpStatePorts, UploadLimits};

/// One mock per driving port; set expectations, then build the state.
#[derive(Default)]
pub struct MockPorts {
    pub identity: MockIdentityCommand,
    pub gate: MockAccessGate,
    pub applications: MockApplicationCommand,
    pub applications_query: MockApplicationQuery,
    pub favorites: MockFavoritesCommand,
    pub favorites_query: MockFavoritesQuery,
    pub resumes: MockResumeStore,
}

impl MockPorts {
    pub fn into_state(self) -> HttpState {
        self.into_state_with_limits(UploadLimits::default())
    }

    pub fn into_state_with_limits(self, limits: UploadLimits) -> HttpState {
        HttpState::new(
            HttpStatePorts {
                identity: Arc::new(self.identity),
                gate: Arc::new(self.gate),
                applications: Arc::new(self.applications),
                applications_query: Arc::new(self.applications_query),
                favorites: Arc::new(self.favorites),
                favorites_query: Arc::new(self.favorites_query),
                resumes: Arc::new(self.resumes),
            },
            limits,
        )
    }
}

/// `Authorization` header carrying `token`.
pub fn bearer(token: &str) -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {token}"))
}

/// Authenticated caller with the given role.
pub fn principal(role: Role) -> Principal {
    Principal::new(UserProfile {
        id: UserId::random(),
        email: EmailAddress::new("alice@x.com").expect("fixture email"),
        role,
        first_name: PersonName::new("Alice", "firstName").expect("fixture name"),
        last_name: PersonName::new("Liddell", "lastName").expect("fixture name"),
    })
}

/// Encoded `multipart/form-data` body and its content type.
///
/// Each part is `(field name, optional file name, bytes)`.
pub fn multipart_body(parts: &[(&str, Option<&str>, &[u8])]) -> (String, Vec<u8>) {
    const BOUNDARY: &str = "jobboard-test-boundary";
    let mut body = Vec::new();
    for (name, file_name, bytes) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        let disposition = match file_name {
            Some(file) => format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            ),
            None => format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"),
        };
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}
