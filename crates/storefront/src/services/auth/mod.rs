//! Authentication service.
//!
//! A two-state session machine: anonymous (no current user) or
//! authenticated. The signed-in user is persisted as JSON under
//! [`SESSION_KEY`] so the session survives restarts; there is no expiry.

mod error;

pub use error::AuthError;

use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use secrecy::{ExposeSecret, SecretString};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use sr_robot_core::{Email, KeyValueStore, KeyValueStoreExt, StorageError, User};

use crate::config::AdminCredentials;

/// Storage key holding the serialized signed-in user.
pub const SESSION_KEY: &str = "sr-robot-user";

/// Display name given to administrator sessions.
pub const ADMIN_DISPLAY_NAME: &str = "Administrador Sr. Robot";

/// Minimum password length accepted at sign-in for shopper accounts.
const MIN_LOGIN_PASSWORD_LENGTH: usize = 6;

/// Minimum password length required at registration.
const MIN_PASSWORD_LENGTH: usize = 8;

// =============================================================================
// Credential Verification
// =============================================================================

/// Decides which credentials belong to the administrator.
pub trait CredentialVerifier: Send + Sync {
    /// Whether `email` is the administrator account.
    fn is_admin_account(&self, email: &Email) -> bool;

    /// Whether `password` is the administrator's password for `email`.
    fn verify_admin(&self, email: &Email, password: &str) -> bool;
}

/// Verifier used when no administrator is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAdmin;

impl CredentialVerifier for NoAdmin {
    fn is_admin_account(&self, _email: &Email) -> bool {
        false
    }

    fn verify_admin(&self, _email: &Email, _password: &str) -> bool {
        false
    }
}

/// Administrator account from configuration, checked against an Argon2 hash.
pub struct ConfiguredAdmin {
    email: Email,
    password_hash: SecretString,
}

impl ConfiguredAdmin {
    #[must_use]
    pub fn new(credentials: &AdminCredentials) -> Self {
        Self {
            email: credentials.email.clone(),
            password_hash: credentials.password_hash.clone(),
        }
    }
}

impl CredentialVerifier for ConfiguredAdmin {
    fn is_admin_account(&self, email: &Email) -> bool {
        self.email.eq_ignore_case(email)
    }

    fn verify_admin(&self, email: &Email, password: &str) -> bool {
        self.is_admin_account(email)
            && verify_password(password, self.password_hash.expose_secret()).is_ok()
    }
}

/// Build the verifier matching the configured credentials.
#[must_use]
pub fn verifier_for(admin: Option<&AdminCredentials>) -> Arc<dyn CredentialVerifier> {
    match admin {
        Some(credentials) => Arc::new(ConfiguredAdmin::new(credentials)),
        None => Arc::new(NoAdmin),
    }
}

// =============================================================================
// Session State Machine
// =============================================================================

/// Authentication service.
///
/// Handles sign-in, registration and sign-out for the current shopper.
pub struct AuthService {
    store: Arc<dyn KeyValueStore>,
    verifier: Arc<dyn CredentialVerifier>,
    current: Option<User>,
}

impl AuthService {
    /// Create an anonymous session without reading storage.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, verifier: Arc<dyn CredentialVerifier>) -> Self {
        Self {
            store,
            verifier,
            current: None,
        }
    }

    /// Create a session, resuming the user persisted in `store` if any.
    ///
    /// A record that no longer decodes is discarded and the session starts
    /// anonymous. So is an administrator record whose email is not the
    /// configured administrator account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the store cannot be read.
    #[instrument(skip_all)]
    pub fn restore(
        store: Arc<dyn KeyValueStore>,
        verifier: Arc<dyn CredentialVerifier>,
    ) -> Result<Self, AuthError> {
        let current = match store.get_json::<User>(SESSION_KEY) {
            Ok(Some(user)) if user.is_admin && !verifier.is_admin_account(&user.email) => {
                warn!(user_id = %user.id, "Discarding administrator session without matching credentials");
                store.remove(SESSION_KEY)?;
                None
            }
            Ok(user) => user,
            Err(StorageError::Serialization(e)) => {
                warn!(error = %e, "Discarding unreadable session record");
                if store.remove(SESSION_KEY).is_err() {
                    store.clear()?;
                }
                None
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(user) = &current {
            info!(user_id = %user.id, is_admin = user.is_admin, "Restored session");
        }

        Ok(Self {
            store,
            verifier,
            current,
        })
    }

    /// The signed-in user, if any.
    #[must_use]
    pub const fn current_user(&self) -> Option<&User> {
        self.current.as_ref()
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.current.as_ref().is_some_and(|user| user.is_admin)
    }

    /// Sign in with email and password.
    ///
    /// The administrator account signs in only with its configured password.
    /// Any other well-formed email signs in as a shopper when the password
    /// has at least 6 characters; this is a simulation, not a user store.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for every rejected attempt,
    /// and `AuthError::Storage` if the session cannot be persisted.
    #[instrument(skip(self, password))]
    pub fn login(&mut self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let user = if self.verifier.is_admin_account(&email) {
            if !self.verifier.verify_admin(&email, password) {
                return Err(AuthError::InvalidCredentials);
            }
            User::admin(ADMIN_DISPLAY_NAME, email)
        } else {
            if password.chars().count() < MIN_LOGIN_PASSWORD_LENGTH {
                return Err(AuthError::InvalidCredentials);
            }
            let name = email.local_part().to_owned();
            User::shopper(name, email)
        };

        self.start_session(user)
    }

    /// Create a shopper account and sign it in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingName`, `AuthError::InvalidEmail` or
    /// `AuthError::WeakPassword` for invalid input, and `AuthError::Storage`
    /// if the session cannot be persisted.
    #[instrument(skip(self, password))]
    pub fn register(&mut self, name: &str, email: &str, password: &str) -> Result<User, AuthError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AuthError::MissingName);
        }
        let email = Email::parse(email)?;
        if self.verifier.is_admin_account(&email) {
            return Err(AuthError::InvalidCredentials);
        }
        validate_password(password)?;

        self.start_session(User::shopper(name, email))
    }

    /// Sign out and forget the persisted session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the record cannot be removed.
    #[instrument(skip(self))]
    pub fn logout(&mut self) -> Result<(), AuthError> {
        self.store.remove(SESSION_KEY)?;
        if let Some(user) = self.current.take() {
            info!(user_id = %user.id, "User signed out");
        }
        Ok(())
    }

    fn start_session(&mut self, user: User) -> Result<User, AuthError> {
        self.store.set_json(SESSION_KEY, &user)?;
        info!(user_id = %user.id, is_admin = user.is_admin, "User signed in");
        self.current = Some(user.clone());
        Ok(user)
    }
}

// =============================================================================
// Password Helpers
// =============================================================================

/// Validate a registration password.
///
/// Requires at least 8 characters, an uppercase letter and a digit; the
/// error message lists every missing rule.
///
/// # Errors
///
/// Returns `AuthError::WeakPassword` when any rule fails.
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    let mut missing = Vec::new();
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        missing.push(format!("at least {MIN_PASSWORD_LENGTH} characters"));
    }
    if !password.chars().any(char::is_uppercase) {
        missing.push("an uppercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        missing.push("a number".to_string());
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AuthError::WeakPassword(format!(
            "password must have {}",
            missing.join(", ")
        )))
    }
}

/// Hash a password using Argon2id with a random salt.
///
/// # Errors
///
/// Returns `argon2::password_hash::Error` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
}

/// Verify a password against a PHC hash string.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use sr_robot_core::MemoryStore;

    use super::*;

    const ADMIN_EMAIL: &str = "admin@srrobot.com";
    const ADMIN_PASSWORD: &str = "Robot-Admin-9";

    fn admin_verifier() -> Arc<dyn CredentialVerifier> {
        let credentials = AdminCredentials {
            email: Email::parse(ADMIN_EMAIL).unwrap(),
            password_hash: SecretString::from(hash_password(ADMIN_PASSWORD).unwrap()),
        };
        verifier_for(Some(&credentials))
    }

    fn service(store: &Arc<dyn KeyValueStore>) -> AuthService {
        AuthService::new(Arc::clone(store), admin_verifier())
    }

    fn memory() -> Arc<dyn KeyValueStore> {
        Arc::new(MemoryStore::new())
    }

    #[test]
    fn test_admin_login() {
        let store = memory();
        let mut auth = service(&store);
        let user = auth.login(ADMIN_EMAIL, ADMIN_PASSWORD).unwrap();
        assert!(user.is_admin);
        assert_eq!(user.name, ADMIN_DISPLAY_NAME);
        assert!(auth.is_admin());
    }

    #[test]
    fn test_admin_email_with_wrong_password_is_rejected() {
        let store = memory();
        let mut auth = service(&store);
        let err = auth.login("ADMIN@srrobot.com", "wrong-password").unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert!(!auth.is_authenticated());
        assert_eq!(store.get(SESSION_KEY).unwrap(), None);
    }

    #[test]
    fn test_shopper_login_uses_local_part_as_name() {
        let store = memory();
        let mut auth = service(&store);
        let user = auth.login("maria.lopez@correo.pe", "123456").unwrap();
        assert!(!user.is_admin);
        assert_eq!(user.name, "maria.lopez");
        assert!(user.id.as_str().starts_with("user-"));
    }

    #[test]
    fn test_shopper_login_rejects_short_password_and_bad_email() {
        let store = memory();
        let mut auth = service(&store);
        assert!(matches!(
            auth.login("maria@correo.pe", "12345"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login("not-an-email", "123456"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(!auth.is_authenticated());
    }

    #[test]
    fn test_no_admin_configured() {
        let store = memory();
        let mut auth = AuthService::new(Arc::clone(&store), Arc::new(NoAdmin));
        let user = auth.login(ADMIN_EMAIL, ADMIN_PASSWORD).unwrap();
        assert!(!user.is_admin);
    }

    #[test]
    fn test_register_persists_and_authenticates() {
        let store = memory();
        let mut auth = service(&store);
        let user = auth.register("  Ana Torres ", "ana@correo.pe", "Segura123").unwrap();
        assert_eq!(user.name, "Ana Torres");
        assert_eq!(auth.current_user(), Some(&user));

        let persisted: Option<User> = store.get_json(SESSION_KEY).unwrap();
        assert_eq!(persisted, Some(user));
    }

    #[test]
    fn test_register_validation() {
        let store = memory();
        let mut auth = service(&store);
        assert!(matches!(
            auth.register(" ", "ana@correo.pe", "Segura123"),
            Err(AuthError::MissingName)
        ));
        assert!(matches!(
            auth.register("Ana", "ana", "Segura123"),
            Err(AuthError::InvalidEmail(_))
        ));
        assert!(matches!(
            auth.register("Ana", ADMIN_EMAIL, "Segura123"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(!auth.is_authenticated());
    }

    #[test]
    fn test_password_policy_lists_missing_rules() {
        let err = validate_password("abc").unwrap_err();
        let AuthError::WeakPassword(message) = err else {
            panic!("expected WeakPassword");
        };
        assert_eq!(
            message,
            "password must have at least 8 characters, an uppercase letter, a number"
        );
        assert!(validate_password("Segura123").is_ok());
        assert!(validate_password("segura123").is_err());
    }

    #[test]
    fn test_logout_clears_persisted_session() {
        let store = memory();
        let mut auth = service(&store);
        auth.login("maria@correo.pe", "123456").unwrap();
        auth.logout().unwrap();
        assert!(!auth.is_authenticated());
        assert_eq!(store.get(SESSION_KEY).unwrap(), None);
        // Signing out twice is harmless.
        auth.logout().unwrap();
    }

    #[test]
    fn test_restore_resumes_session() {
        let store = memory();
        let user = service(&store).login("maria@correo.pe", "123456").unwrap();

        let restored = AuthService::restore(Arc::clone(&store), admin_verifier()).unwrap();
        assert_eq!(restored.current_user(), Some(&user));
    }

    #[test]
    fn test_restore_discards_corrupt_record() {
        let store = memory();
        store.set(SESSION_KEY, "{\"id\":").unwrap();
        let restored = AuthService::restore(Arc::clone(&store), admin_verifier()).unwrap();
        assert!(!restored.is_authenticated());
        assert_eq!(store.get(SESSION_KEY).unwrap(), None);
    }

    #[test]
    fn test_restore_drops_admin_session_without_configured_admin() {
        let store = memory();
        service(&store).login(ADMIN_EMAIL, ADMIN_PASSWORD).unwrap();

        let restored = AuthService::restore(Arc::clone(&store), Arc::new(NoAdmin)).unwrap();
        assert!(!restored.is_authenticated());
        assert!(!restored.is_admin());
        assert_eq!(store.get(SESSION_KEY).unwrap(), None);
    }

    #[test]
    fn test_restore_drops_admin_flag_on_other_account() {
        let store = memory();
        store
            .set(
                SESSION_KEY,
                r#"{"id":"admin-1","name":"Intruso","email":"maria@correo.pe","isAdmin":true}"#,
            )
            .unwrap();

        let restored = AuthService::restore(Arc::clone(&store), admin_verifier()).unwrap();
        assert!(!restored.is_admin());
        assert_eq!(store.get(SESSION_KEY).unwrap(), None);
    }

    #[test]
    fn test_restore_keeps_configured_admin_session() {
        let store = memory();
        service(&store).login(ADMIN_EMAIL, ADMIN_PASSWORD).unwrap();

        let restored = AuthService::restore(Arc::clone(&store), admin_verifier()).unwrap();
        assert!(restored.is_admin());
    }
}
