//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SR_ROBOT_HOST` - Bind address (default: 127.0.0.1)
//! - `SR_ROBOT_PORT` - Listen port (default: 3000)
//! - `SR_ROBOT_SESSION_FILE` - JSON file holding the signed-in user (default: data/session.json)
//! - `SR_ROBOT_ADMIN_EMAIL` - Administrator email (requires `SR_ROBOT_ADMIN_PASSWORD_HASH`)
//! - `SR_ROBOT_ADMIN_PASSWORD_HASH` - Argon2 PHC hash of the administrator password
//!   (generate with `sr-cli hash-password`)
//! - `SR_ROBOT_SIMULATED_LATENCY_MS` - Delay applied to admin mutations (default: 0)
//! - `SR_ROBOT_LOG_FORMAT` - `json` for structured logs, anything else for text (default: text)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//!
//! Without admin credentials the dashboard is unreachable: nobody can sign in
//! as administrator.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use argon2::password_hash::PasswordHash;
use secrecy::{ExposeSecret, SecretString};
use sr_robot_core::Email;
use thiserror::Error;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_SESSION_FILE: &str = "data/session.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// File backing the persisted session record
    pub session_file: PathBuf,
    /// Administrator credentials, if the dashboard is enabled
    pub admin: Option<AdminCredentials>,
    /// Artificial delay before admin mutations complete
    pub simulated_latency: Duration,
    /// Emit logs as JSON lines
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name (e.g. "production")
    pub sentry_environment: Option<String>,
}

/// Administrator sign-in credentials.
///
/// Implements `Debug` manually to redact the password hash.
#[derive(Clone)]
pub struct AdminCredentials {
    pub email: Email,
    /// Argon2 PHC string
    pub password_hash: SecretString,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            admin: None,
            simulated_latency: Duration::ZERO,
            log_json: false,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is invalid, or if only one of the
    /// two admin credential variables is set.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`StorefrontConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let vars = Vars(&lookup);

        let host = vars
            .or_default("SR_ROBOT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("SR_ROBOT_HOST".to_string(), e.to_string()))?;
        let port = vars
            .or_default("SR_ROBOT_PORT", &DEFAULT_PORT.to_string())
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SR_ROBOT_PORT".to_string(), e.to_string()))?;
        let session_file = PathBuf::from(vars.or_default("SR_ROBOT_SESSION_FILE", DEFAULT_SESSION_FILE));
        let latency_ms = vars
            .or_default("SR_ROBOT_SIMULATED_LATENCY_MS", "0")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SR_ROBOT_SIMULATED_LATENCY_MS".to_string(), e.to_string())
            })?;

        Ok(Self {
            host,
            port,
            session_file,
            admin: AdminCredentials::from_vars(&vars)?,
            simulated_latency: Duration::from_millis(latency_ms),
            log_json: vars
                .optional("SR_ROBOT_LOG_FORMAT")
                .is_some_and(|format| format.eq_ignore_ascii_case("json")),
            sentry_dsn: vars.optional("SENTRY_DSN"),
            sentry_environment: vars.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl AdminCredentials {
    fn from_vars(vars: &Vars<'_>) -> Result<Option<Self>, ConfigError> {
        let email = vars.optional("SR_ROBOT_ADMIN_EMAIL");
        let hash = vars.optional("SR_ROBOT_ADMIN_PASSWORD_HASH");

        match (email, hash) {
            (None, None) => Ok(None),
            (Some(_), None) => Err(ConfigError::MissingEnvVar(
                "SR_ROBOT_ADMIN_PASSWORD_HASH".to_string(),
            )),
            (None, Some(_)) => Err(ConfigError::MissingEnvVar(
                "SR_ROBOT_ADMIN_EMAIL".to_string(),
            )),
            (Some(email), Some(hash)) => {
                let email = Email::parse(&email).map_err(|e| {
                    ConfigError::InvalidEnvVar("SR_ROBOT_ADMIN_EMAIL".to_string(), e.to_string())
                })?;
                let password_hash = SecretString::from(hash);
                validate_password_hash(&password_hash, "SR_ROBOT_ADMIN_PASSWORD_HASH")?;
                Ok(Some(Self {
                    email,
                    password_hash,
                }))
            }
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable lookup with the usual fallbacks.
struct Vars<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Vars<'_> {
    /// Get an optional variable; blank values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }
}

/// Check that a configured hash is a PHC string `argon2` can verify against.
fn validate_password_hash(hash: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    PasswordHash::new(hash.expose_secret()).map_err(|e| {
        ConfigError::InvalidEnvVar(var_name.to_string(), format!("not a PHC hash string: {e}"))
    })?;
    Ok(())
}
