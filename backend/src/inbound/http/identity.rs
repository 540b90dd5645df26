//! Registration, login and caller profile handlers.
//!
//! ```text
//! POST /api/v1/auth/register {"firstName":"Alice","lastName":"Liddell","email":"alice@x.com","password":"pw123","role":"student"}
//! POST /api/v1/auth/login {"email":"alice@x.com","password":"pw123"}
//! GET  /api/v1/auth/me
//! ```

use std::fmt;
use std::str::FromStr;

use actix_web::{HttpRequest, HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{LoginCredentials, LoginOutcome, Registration, Role, RoleSet, UserProfile};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::authorize;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{map_credential_error, map_user_validation_error};

/// Registration body. `role` defaults to `student`.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[schema(example = "student")]
    pub role: Option<String>,
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = crate::domain::Error;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        let role = match value.role.as_deref() {
            None => Role::Student,
            Some(raw) => Role::from_str(raw).map_err(map_user_validation_error)?,
        };
        Registration::try_new(
            &value.first_name,
            &value.last_name,
            &value.email,
            &value.password,
            role,
        )
        .map_err(map_credential_error)
    }
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

/// Login body.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Successful login payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
    pub first_name: String,
    pub expires_at: DateTime<Utc>,
}

impl From<LoginOutcome> for LoginResponse {
    fn from(outcome: LoginOutcome) -> Self {
        Self {
            token: outcome.token.token.as_str().to_owned(),
            role: outcome.role,
            first_name: outcome.first_name.into(),
            expires_at: outcome.token.expires_at,
        }
    }
}

/// Create an account.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserProfile),
        (status = 400, description = "Invalid request or email already registered", body = ErrorSchema),
        (status = 403, description = "Admin self-registration disabled", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = Registration::try_from(payload.into_inner())?;
    let profile = state.identity.register(registration).await?;
    Ok(HttpResponse::Created().json(profile))
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse),
        (status = 400, description = "Invalid request or credentials", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let LoginRequest { email, password } = payload.into_inner();
    let credentials =
        LoginCredentials::try_from_parts(&email, &password).map_err(map_credential_error)?;
    let outcome = state.identity.login(credentials).await?;
    Ok(web::Json(LoginResponse::from(outcome)))
}

/// Profile of the authenticated caller.
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Caller profile", body = UserProfile),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "currentUser"
)]
#[get("/auth/me")]
pub async fn me(state: web::Data<HttpState>, req: HttpRequest) -> ApiResult<web::Json<UserProfile>> {
    let principal = authorize(&state, &req, RoleSet::ANY).await?;
    Ok(web::Json(principal.profile().clone()))
}

#[cfg(test)]
mod tests {
    //! Handler tests against mocked ports.
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use chrono::TimeZone;
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::error::reason;
    use crate::domain::{BearerToken, Error, IssuedToken, PersonName};
    use crate::inbound::http::test_utils::{MockPorts, bearer, principal};

    fn profile(role: Role) -> UserProfile {
        principal(role).profile().clone()
    }

    #[rstest]
    fn request_bodies_redact_passwords_in_debug_output() {
        let login_body = LoginRequest {
            email: "alice@x.com".to_owned(),
            password: "hunter2-secret".to_owned(),
        };
        let register_body = RegisterRequest {
            first_name: "Alice".to_owned(),
            last_name: "Liddell".to_owned(),
            email: "alice@x.com".to_owned(),
            password: "hunter2-secret".to_owned(),
            role: None,
        };

        for rendered in [format!("{login_body:?}"), format!("{register_body:?}")] {
            assert!(!rendered.contains("hunter2-secret"), "leaked: {rendered}");
            assert!(rendered.contains("alice@x.com"));
        }
    }

    async fn call(ports: MockPorts, request: actix_test::TestRequest) -> (StatusCode, Value) {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(ports.into_state()))
                .service(web::scope("/api/v1").service(register).service(login).service(me)),
        )
        .await;
        let response = actix_test::call_service(&app, request.to_request()).await;
        let status = response.status();
        let body = actix_test::read_body(response).await;
        let value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).expect("JSON body")
        };
        (status, value)
    }

    #[rstest]
    #[actix_web::test]
    async fn register_returns_created_profile_defaulting_to_student() {
        let mut ports = MockPorts::default();
        ports
            .identity
            .expect_register()
            .withf(|registration| {
                registration.role() == Role::Student
                    && registration.email().as_ref() == "alice@x.com"
            })
            .return_once(|_| Ok(profile(Role::Student)));

        let (status, body) = call(
            ports,
            actix_test::TestRequest::post()
                .uri("/api/v1/auth/register")
                .set_json(json!({
                    "firstName": "Alice",
                    "lastName": "Liddell",
                    "email": "Alice@X.com",
                    "password": "pw123"
                })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["email"], "alice@x.com");
        assert_eq!(body["role"], "student");
        assert!(body.get("passwordHash").is_none());
    }

    #[rstest]
    #[case(json!({"firstName": "", "lastName": "L", "email": "a@x.com", "password": "pw"}), "firstName")]
    #[case(json!({"firstName": "A", "lastName": "L", "email": "nope", "password": "pw"}), "email")]
    #[case(json!({"firstName": "A", "lastName": "L", "email": "a@x.com", "password": ""}), "password")]
    #[case(json!({"firstName": "A", "lastName": "L", "email": "a@x.com", "password": "pw", "role": "owner"}), "role")]
    #[actix_web::test]
    async fn register_rejects_invalid_fields_before_the_port(
        #[case] payload: Value,
        #[case] field: &str,
    ) {
        let mut ports = MockPorts::default();
        ports.identity.expect_register().never();

        let (status, body) = call(
            ports,
            actix_test::TestRequest::post()
                .uri("/api/v1/auth/register")
                .set_json(payload),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["field"], field);
    }

    #[rstest]
    #[actix_web::test]
    async fn duplicate_email_is_bad_request() {
        let mut ports = MockPorts::default();
        ports.identity.expect_register().return_once(|_| {
            Err(Error::invalid_request("email already registered").with_reason(reason::EMAIL_TAKEN))
        });

        let (status, body) = call(
            ports,
            actix_test::TestRequest::post()
                .uri("/api/v1/auth/register")
                .set_json(json!({
                    "firstName": "Alice",
                    "lastName": "Liddell",
                    "email": "alice@x.com",
                    "password": "pw123",
                    "role": "student"
                })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["code"], reason::EMAIL_TAKEN);
    }

    #[rstest]
    #[actix_web::test]
    async fn login_returns_token_role_and_first_name() {
        let expires_at = Utc
            .with_ymd_and_hms(2026, 3, 9, 9, 0, 0)
            .single()
            .expect("timestamp");
        let mut ports = MockPorts::default();
        ports.identity.expect_login().return_once(move |_| {
            Ok(LoginOutcome {
                token: IssuedToken {
                    token: BearerToken::new("signed.jwt.value"),
                    expires_at,
                },
                role: Role::Student,
                first_name: PersonName::new("Alice", "firstName").expect("name"),
            })
        });

        let (status, body) = call(
            ports,
            actix_test::TestRequest::post()
                .uri("/api/v1/auth/login")
                .set_json(json!({"email": "alice@x.com", "password": "pw123"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["token"], "signed.jwt.value");
        assert_eq!(body["role"], "student");
        assert_eq!(body["firstName"], "Alice");
        assert_eq!(body["expiresAt"], "2026-03-09T09:00:00Z");
    }

    #[rstest]
    #[actix_web::test]
    async fn malformed_json_is_bad_request() {
        let mut ports = MockPorts::default();
        ports.identity.expect_login().never();

        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(ports.into_state()))
                .app_data(
                    web::JsonConfig::default()
                        .error_handler(crate::inbound::http::error::json_error_handler),
                )
                .service(web::scope("/api/v1").service(login)),
        )
        .await;
        let request = actix_test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[rstest]
    #[actix_web::test]
    async fn me_returns_the_principal_profile() {
        let caller = principal(Role::Admin);
        let expected_id = caller.user_id().to_string();
        let mut ports = MockPorts::default();
        ports
            .gate
            .expect_authorize()
            .withf(|token, allowed| {
                token.as_ref().map(BearerToken::as_str) == Some("tkn") && *allowed == RoleSet::ANY
            })
            .return_once(move |_, _| Ok(caller));

        let (status, body) = call(
            ports,
            actix_test::TestRequest::get()
                .uri("/api/v1/auth/me")
                .insert_header(bearer("tkn")),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], expected_id.as_str());
        assert_eq!(body["role"], "admin");
    }

    #[rstest]
    #[actix_web::test]
    async fn me_without_token_is_unauthorized() {
        let mut ports = MockPorts::default();
        ports
            .gate
            .expect_authorize()
            .withf(|token, _| token.is_none())
            .return_once(|_, _| Err(Error::unauthorized("missing bearer token")));

        let (status, _) = call(
            ports,
            actix_test::TestRequest::get().uri("/api/v1/auth/me"),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
