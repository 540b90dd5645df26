//! Authentication primitives: credentials, registrations, tokens and
//! authenticated principals.
//!
//! Inbound payload parsing stays outside the domain; handlers call the
//! validating constructors here before talking to a port or service.

use std::fmt;

use chrono::{DateTime, Utc};
use zeroize::Zeroizing;

use super::{EmailAddress, PersonName, Role, UserId, UserProfile, UserValidationError};

/// Upper bound on accepted password length, in bytes.
pub const PASSWORD_MAX_BYTES: usize = 128;

/// Domain error returned when credential payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialValidationError {
    #[error(transparent)]
    Field(#[from] UserValidationError),
    #[error("password must not be empty")]
    EmptyPassword,
    #[error("password must be at most {max} bytes")]
    PasswordTooLong { max: usize },
}

fn validate_password(password: &str) -> Result<Zeroizing<String>, CredentialValidationError> {
    if password.is_empty() {
        return Err(CredentialValidationError::EmptyPassword);
    }
    if password.len() > PASSWORD_MAX_BYTES {
        return Err(CredentialValidationError::PasswordTooLong {
            max: PASSWORD_MAX_BYTES,
        });
    }
    Ok(Zeroizing::new(password.to_owned()))
}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is normalised (see [`EmailAddress`]).
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use jobboard::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("Alice@X.com", "pw123").unwrap();
/// assert_eq!(creds.email().as_ref(), "alice@x.com");
/// assert_eq!(creds.password(), "pw123");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialValidationError> {
        let email = EmailAddress::new(email)?;
        let password = validate_password(password)?;
        Ok(Self { email, password })
    }

    /// Normalised email used for the account lookup.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password supplied by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Validated self-registration request.
#[derive(Clone, PartialEq, Eq)]
pub struct Registration {
    first_name: PersonName,
    last_name: PersonName,
    email: EmailAddress,
    password: Zeroizing<String>,
    role: Role,
}

impl Registration {
    /// Validate the raw registration fields.
    pub fn try_new(
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<Self, CredentialValidationError> {
        Ok(Self {
            first_name: PersonName::new(first_name, "firstName")?,
            last_name: PersonName::new(last_name, "lastName")?,
            email: EmailAddress::new(email)?,
            password: validate_password(password)?,
            role,
        })
    }

    /// Given name as entered.
    pub fn first_name(&self) -> &PersonName {
        &self.first_name
    }

    /// Family name as entered.
    pub fn last_name(&self) -> &PersonName {
        &self.last_name
    }

    /// Normalised email; the account's unique key.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Plaintext password, to be hashed before storage.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Requested role, still subject to the signup policy.
    pub fn role(&self) -> Role {
        self.role
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

/// Set of roles an operation accepts. Empty means any authenticated user.
///
/// # Examples
/// ```
/// use jobboard::domain::{Role, RoleSet};
///
/// assert!(RoleSet::ANY.permits(Role::Admin));
/// assert!(!RoleSet::STUDENTS.permits(Role::Admin));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleSet(&'static [Role]);

impl RoleSet {
    /// Any authenticated principal.
    pub const ANY: Self = Self(&[]);
    /// Students only.
    pub const STUDENTS: Self = Self(&[Role::Student]);
    /// Admins only.
    pub const ADMINS: Self = Self(&[Role::Admin]);

    /// Build a set from a static role list.
    pub const fn of(roles: &'static [Role]) -> Self {
        Self(roles)
    }

    /// Whether `role` satisfies this set.
    pub fn permits(self, role: Role) -> bool {
        self.0.is_empty() || self.0.contains(&role)
    }
}

/// Raw bearer token lifted from the `Authorization` header.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Wrap a raw token string without validating it.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

/// Verified claim set carried by a bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub user_id: UserId,
    pub role: Role,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Freshly signed token together with its expiry.
#[derive(Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: BearerToken,
    pub expires_at: DateTime<Utc>,
}

impl fmt::Debug for IssuedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedToken")
            .field("token", &self.token)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub token: IssuedToken,
    pub role: Role,
    pub first_name: PersonName,
}

/// Authenticated caller resolved by the authorization gate.
///
/// Built from the stored account, so `role` reflects the current record
/// rather than the token claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    profile: UserProfile,
}

impl Principal {
    /// Principal for the given stored account.
    pub fn new(profile: UserProfile) -> Self {
        Self { profile }
    }

    /// Caller's account id.
    pub fn user_id(&self) -> UserId {
        self.profile.id
    }

    /// Role on the stored account.
    pub fn role(&self) -> Role {
        self.profile.role
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }
}
