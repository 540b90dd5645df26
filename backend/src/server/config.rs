//! Server settings loaded via OrthoConfig and the resolved server config.

use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::TimeDelta;
use ortho_config::OrthoConfig;
use serde::Deserialize;

use jobboard::domain::SignupPolicy;
use jobboard::inbound::http::state::{DEFAULT_MAX_RESUME_BYTES, UploadLimits};
use jobboard::outbound::persistence::DbPool;
use jobboard::outbound::security::TokenKey;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_RESUME_DIR: &str = "var/resumes";
const DEFAULT_TOKEN_TTL_HOURS: i64 = 24 * 7;

/// Errors raised while resolving settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// `bind_addr` is not a socket address.
    #[error("invalid bind address {value:?}: {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    /// Token lifetime outside one hour to one year.
    #[error("token TTL must be between 1 and 8760 hours, got {0}")]
    TokenTtl(i64),
    /// `max_resume_bytes` was zero.
    #[error("max resume size must be positive")]
    MaxResumeBytes,
}

/// Values read from `JOBBOARD_*` environment variables, config files and CLI
/// flags.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "JOBBOARD")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; without one the in-memory store is used.
    pub database_url: Option<String>,
    /// Directory receiving uploaded resumes.
    pub resume_dir: Option<PathBuf>,
    /// Bearer token lifetime in hours.
    pub token_ttl_hours: Option<i64>,
    /// Largest accepted resume upload.
    pub max_resume_bytes: Option<usize>,
    /// Allow `role: "admin"` on self-registration.
    #[ortho_config(default = false)]
    pub allow_admin_signup: bool,
}

impl ServerSettings {
    /// Listen address, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Resume directory, `var/resumes` unless configured.
    pub fn resume_dir(&self) -> PathBuf {
        self.resume_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RESUME_DIR))
    }

    /// Token lifetime; one week by default, at most one year.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::TokenTtl`] when the hours fall outside `1..=8760`.
    pub fn token_ttl(&self) -> Result<TimeDelta, SettingsError> {
        let hours = self.token_ttl_hours.unwrap_or(DEFAULT_TOKEN_TTL_HOURS);
        if !(1..=24 * 365).contains(&hours) {
            return Err(SettingsError::TokenTtl(hours));
        }
        Ok(TimeDelta::hours(hours))
    }

    /// Upload limits with the default resume cap applied.
    pub fn upload_limits(&self) -> Result<UploadLimits, SettingsError> {
        match self.max_resume_bytes.unwrap_or(DEFAULT_MAX_RESUME_BYTES) {
            0 => Err(SettingsError::MaxResumeBytes),
            max_resume_bytes => Ok(UploadLimits { max_resume_bytes }),
        }
    }

    /// Whether self-registration may request the admin role.
    pub fn signup_policy(&self) -> SignupPolicy {
        SignupPolicy {
            allow_admin: self.allow_admin_signup,
        }
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) token_key: TokenKey,
    pub(crate) token_ttl: TimeDelta,
    pub(crate) resume_dir: PathBuf,
    pub(crate) limits: UploadLimits,
    pub(crate) signup: SignupPolicy,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Resolve settings into a server configuration without a database.
    pub fn from_settings(
        settings: &ServerSettings,
        token_key: TokenKey,
    ) -> Result<Self, SettingsError> {
        Ok(Self {
            bind_addr: settings.bind_addr()?,
            token_key,
            token_ttl: settings.token_ttl()?,
            resume_dir: settings.resume_dir(),
            limits: settings.upload_limits()?,
            signup: settings.signup_policy(),
            db_pool: None,
        })
    }

    /// Attach a database pool; repositories then use PostgreSQL.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Name of the configured job store, reported by health probes.
    pub fn backend_name(&self) -> &'static str {
        if self.db_pool.is_some() { "postgres" } else { "memory" }
    }
}

#[cfg(test)]
mod tests {
    //! Settings parsing and defaults.

    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    use super::*;

    const VARS: [&str; 6] = [
        "JOBBOARD_BIND_ADDR",
        "JOBBOARD_DATABASE_URL",
        "JOBBOARD_RESUME_DIR",
        "JOBBOARD_TOKEN_TTL_HOURS",
        "JOBBOARD_MAX_RESUME_BYTES",
        "JOBBOARD_ALLOW_ADMIN_SIGNUP",
    ];

    fn load() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("jobboard")]).expect("settings load")
    }

    fn settings() -> ServerSettings {
        ServerSettings {
            bind_addr: None,
            database_url: None,
            resume_dir: None,
            token_ttl_hours: None,
            max_resume_bytes: None,
            allow_admin_signup: false,
        }
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load();

        assert_eq!(
            settings.bind_addr().expect("bind addr"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("addr")
        );
        assert!(settings.database_url.is_none());
        assert_eq!(settings.resume_dir(), PathBuf::from(DEFAULT_RESUME_DIR));
        assert_eq!(settings.token_ttl().expect("ttl"), TimeDelta::hours(168));
        assert_eq!(
            settings.upload_limits().expect("limits").max_resume_bytes,
            DEFAULT_MAX_RESUME_BYTES
        );
        assert!(!settings.signup_policy().allow_admin);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("JOBBOARD_BIND_ADDR", Some("127.0.0.1:9000")),
            ("JOBBOARD_DATABASE_URL", Some("postgres://localhost/jobs")),
            ("JOBBOARD_RESUME_DIR", Some("/srv/resumes")),
            ("JOBBOARD_TOKEN_TTL_HOURS", Some("2")),
            ("JOBBOARD_MAX_RESUME_BYTES", Some("1024")),
            ("JOBBOARD_ALLOW_ADMIN_SIGNUP", Some("true")),
        ]);

        let settings = load();

        assert_eq!(
            settings.bind_addr().expect("bind addr").port(),
            9000
        );
        assert_eq!(
            settings.database_url.as_deref(),
            Some("postgres://localhost/jobs")
        );
        assert_eq!(settings.resume_dir(), PathBuf::from("/srv/resumes"));
        assert_eq!(settings.token_ttl().expect("ttl"), TimeDelta::hours(2));
        assert_eq!(settings.upload_limits().expect("limits").max_resume_bytes, 1024);
        assert!(settings.signup_policy().allow_admin);
    }

    #[rstest]
    #[case(0)]
    #[case(-1)]
    #[case(24 * 365 + 1)]
    fn out_of_range_ttl_is_rejected(#[case] hours: i64) {
        let settings = ServerSettings {
            token_ttl_hours: Some(hours),
            ..settings()
        };
        assert!(matches!(settings.token_ttl(), Err(SettingsError::TokenTtl(h)) if h == hours));
    }

    #[rstest]
    fn unparsable_bind_addr_is_reported() {
        let settings = ServerSettings {
            bind_addr: Some("localhost".to_owned()),
            ..settings()
        };
        let err = settings.bind_addr().expect_err("invalid addr");
        assert!(err.to_string().contains("localhost"));
    }

    #[rstest]
    fn zero_resume_limit_is_rejected() {
        let settings = ServerSettings {
            max_resume_bytes: Some(0),
            ..settings()
        };
        assert!(matches!(
            settings.upload_limits(),
            Err(SettingsError::MaxResumeBytes)
        ));
    }
}
