//! Administrator password hashing.
//!
//! # Usage
//!
//! ```bash
//! # Hash a password given on the command line
//! sr-cli hash-password 'Robot-Admin-9'
//!
//! # Read the password from stdin (keeps it out of shell history)
//! echo 'Robot-Admin-9' | sr-cli hash-password
//! ```
//!
//! The printed PHC string goes into `SR_ROBOT_ADMIN_PASSWORD_HASH`.

use std::io::BufRead;

use secrecy::{ExposeSecret, SecretString};
use sr_robot_storefront::services::auth::hash_password;
use thiserror::Error;

/// Errors that can occur while hashing.
#[derive(Debug, Error)]
pub enum HashError {
    #[error("Failed to read password from stdin: {0}")]
    Stdin(#[from] std::io::Error),

    #[error("Password must not be empty")]
    Empty,

    #[error("Hashing failed: {0}")]
    Hash(argon2::password_hash::Error),
}

/// Hash `password`, or a line read from stdin when `None`, and print it.
///
/// # Errors
///
/// Returns an error if stdin cannot be read, the password is empty, or
/// hashing fails.
pub fn run(password: Option<String>) -> Result<(), HashError> {
    let password = match password {
        Some(password) => SecretString::from(password),
        None => read_stdin_line()?,
    };
    let hash = hash(&password)?;
    print_hash(&hash);
    Ok(())
}

/// Hash a password, rejecting blank input.
///
/// # Errors
///
/// Returns `HashError::Empty` for blank passwords.
pub fn hash(password: &SecretString) -> Result<String, HashError> {
    if password.expose_secret().is_empty() {
        return Err(HashError::Empty);
    }
    hash_password(password.expose_secret()).map_err(HashError::Hash)
}

fn read_stdin_line() -> Result<SecretString, HashError> {
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(SecretString::from(line.trim_end_matches(['\r', '\n']).to_string()))
}

#[allow(clippy::print_stdout)]
fn print_hash(hash: &str) {
    println!("{hash}");
}
