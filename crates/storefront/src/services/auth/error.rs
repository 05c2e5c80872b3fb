//! Authentication error types.

use sr_robot_core::{EmailError, StorageError};
use thiserror::Error;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format (registration only; login reports
    /// `InvalidCredentials` instead).
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Credentials rejected. Deliberately says nothing about which part was wrong.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Registration without a name.
    #[error("name is required")]
    MissingName,

    /// Password does not meet the registration policy.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// The session record could not be read or written.
    #[error("session storage error: {0}")]
    Storage(#[from] StorageError),
}
