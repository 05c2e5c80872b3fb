//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Sign-in, registration and the persisted session
//! - `store` - Catalog management, checkout and order tracking

pub mod auth;
pub mod store;

pub use auth::{AuthError, AuthService, CredentialVerifier};
pub use store::{DashboardStats, StoreError, StoreService};
