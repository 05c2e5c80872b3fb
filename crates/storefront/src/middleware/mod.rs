//! HTTP middleware and extractors for the storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (tag each request for log correlation)
//! 4. CORS (the shop front end runs on another origin)

pub mod auth;
pub mod request_id;

pub use auth::{CurrentUser, RequireAdmin};
pub use request_id::request_id_middleware;
