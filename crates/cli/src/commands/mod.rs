//! CLI command implementations.

pub mod catalog;
pub mod hash_password;
