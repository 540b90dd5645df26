//! Tests for the identity service.

use std::sync::Arc;

use chrono::Duration;
use rstest::rstest;

use super::*;
use crate::domain::ports::{MockPasswordHasher, MockTokenService, MockUserRepository};
use crate::domain::{BearerToken, ErrorCode, IssuedToken};
use crate::test_support::clock::{fixture_clock, fixture_timestamp};
use crate::test_support::fixtures;

type TestService = IdentityService<MockUserRepository, MockPasswordHasher, MockTokenService>;

fn make_service(
    users: MockUserRepository,
    hasher: MockPasswordHasher,
    tokens: MockTokenService,
    policy: SignupPolicy,
) -> TestService {
    IdentityService::new(
        Arc::new(users),
        Arc::new(hasher),
        Arc::new(tokens),
        fixture_clock(),
        policy,
    )
}

fn registration(role: Role) -> Registration {
    Registration::try_new("Alice", "Liddell", "Alice@X.com", "pw123", role)
        .expect("valid registration")
}

fn credentials(password: &str) -> LoginCredentials {
    LoginCredentials::try_from_parts("alice@x.com", password).expect("valid credentials")
}

#[tokio::test]
async fn register_hashes_password_and_inserts_user() {
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .withf(|password| password == "pw123")
        .times(1)
        .return_once(|_| Ok(PasswordHash::new("$argon2id$hashed")));
    let mut users = MockUserRepository::new();
    users
        .expect_insert()
        .withf(|user| {
            user.email.as_ref() == "alice@x.com"
                && user.password_hash.as_str() == "$argon2id$hashed"
                && user.role == Role::Student
                && user.created_at == fixture_timestamp()
        })
        .times(1)
        .return_once(|_| Ok(()));

    let service = make_service(
        users,
        hasher,
        MockTokenService::new(),
        SignupPolicy::default(),
    );
    let profile = service
        .register(registration(Role::Student))
        .await
        .expect("registration succeeds");

    assert_eq!(profile.email.as_ref(), "alice@x.com");
    assert_eq!(profile.role, Role::Student);
    assert_eq!(profile.first_name.as_ref(), "Alice");
}

#[tokio::test]
async fn register_maps_duplicate_email_to_email_taken() {
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .return_once(|_| Ok(PasswordHash::new("$argon2id$hashed")));
    let mut users = MockUserRepository::new();
    users
        .expect_insert()
        .return_once(|_| Err(UserPersistenceError::duplicate_email("alice@x.com")));

    let service = make_service(
        users,
        hasher,
        MockTokenService::new(),
        SignupPolicy::default(),
    );
    let err = service
        .register(registration(Role::Student))
        .await
        .expect_err("duplicate email");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.reason(), Some(reason::EMAIL_TAKEN));
}

#[rstest]
#[case(false, Some(ErrorCode::Forbidden))]
#[case(true, None)]
#[tokio::test]
async fn admin_registration_follows_policy(
    #[case] allow_admin: bool,
    #[case] expected_error: Option<ErrorCode>,
) {
    let mut hasher = MockPasswordHasher::new();
    let mut users = MockUserRepository::new();
    if allow_admin {
        hasher
            .expect_hash()
            .return_once(|_| Ok(PasswordHash::new("$argon2id$hashed")));
        users.expect_insert().return_once(|_| Ok(()));
    }

    let service = make_service(
        users,
        hasher,
        MockTokenService::new(),
        SignupPolicy { allow_admin },
    );
    let result = service.register(registration(Role::Admin)).await;

    assert_eq!(result.err().map(|err| err.code()), expected_error);
}

#[tokio::test]
async fn login_rejects_unknown_email_without_hashing() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().return_once(|_| Ok(None));

    let service = make_service(
        users,
        MockPasswordHasher::new(),
        MockTokenService::new(),
        SignupPolicy::default(),
    );
    let err = service
        .login(credentials("pw123"))
        .await
        .expect_err("unknown email");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.reason(), Some(reason::INVALID_CREDENTIALS));
}

#[tokio::test]
async fn login_rejects_wrong_password_with_same_error() {
    let stored = fixtures::user("alice@x.com", Role::Student);
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .return_once(move |_| Ok(Some(stored)));
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_verify().return_once(|_, _| Ok(false));

    let service = make_service(
        users,
        hasher,
        MockTokenService::new(),
        SignupPolicy::default(),
    );
    let err = service
        .login(credentials("wrong"))
        .await
        .expect_err("wrong password");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.reason(), Some(reason::INVALID_CREDENTIALS));
    assert_eq!(err.message(), "invalid credentials");
}

#[tokio::test]
async fn login_issues_token_for_stored_role() {
    let stored = fixtures::user("alice@x.com", Role::Admin);
    let stored_id = stored.id;
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .withf(|email| email.as_ref() == "alice@x.com")
        .return_once(move |_| Ok(Some(stored)));
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_verify()
        .withf(|password, _| password == "pw123")
        .return_once(|_, _| Ok(true));
    let mut tokens = MockTokenService::new();
    tokens
        .expect_issue()
        .withf(move |user_id, role| *user_id == stored_id && *role == Role::Admin)
        .times(1)
        .return_once(|_, _| {
            Ok(IssuedToken {
                token: BearerToken::new("signed"),
                expires_at: fixture_timestamp() + Duration::days(7),
            })
        });

    let service = make_service(users, hasher, tokens, SignupPolicy::default());
    let outcome = service
        .login(credentials("pw123"))
        .await
        .expect("login succeeds");

    assert_eq!(outcome.token.token.as_str(), "signed");
    assert_eq!(outcome.role, Role::Admin);
    assert_eq!(outcome.first_name.as_ref(), "Alice");
}

#[tokio::test]
async fn login_reports_store_outage_as_unavailable() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .return_once(|_| Err(UserPersistenceError::connection("refused")));

    let service = make_service(
        users,
        MockPasswordHasher::new(),
        MockTokenService::new(),
        SignupPolicy::default(),
    );
    let err = service
        .login(credentials("pw123"))
        .await
        .expect_err("store down");

    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}
