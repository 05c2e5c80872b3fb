//! Integration tests for Sr. Robot.
//!
//! The storefront router is driven in-process with `tower::ServiceExt`, so
//! no server or network is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p sr-robot-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `catalog` - Listing, filtering, sorting and product detail
//! - `cart` - Cart and favorites
//! - `auth` - Sign-in, registration and persisted sessions
//! - `admin` - Dashboard guard, product CRUD, checkout and receipts

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use secrecy::SecretString;
use serde_json::Value;
use sr_robot_core::{Email, KeyValueStore, MemoryStore};
use sr_robot_storefront::config::{AdminCredentials, StorefrontConfig};
use sr_robot_storefront::services::auth::hash_password;
use sr_robot_storefront::state::AppState;
use sr_robot_storefront::{app, seed};
use tower::ServiceExt;

/// Administrator email configured for every test app.
pub const ADMIN_EMAIL: &str = "admin@srrobot.com";

/// Administrator password matching the configured hash.
pub const ADMIN_PASSWORD: &str = "Robot-Admin-9";

/// Upper bound on response bodies read by tests.
const BODY_LIMIT: usize = 1024 * 1024;

/// Hash the admin password once per test binary.
fn admin_hash() -> &'static str {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password(ADMIN_PASSWORD).unwrap_or_default())
}

/// Configuration with the test administrator and no latency.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        admin: Email::parse(ADMIN_EMAIL)
            .ok()
            .map(|email| AdminCredentials {
                email,
                password_hash: SecretString::from(admin_hash().to_owned()),
            }),
        simulated_latency: Duration::ZERO,
        ..StorefrontConfig::default()
    }
}

/// A response as seen by a test.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Parsed JSON body, `Value::Null` when empty or not JSON.
    pub body: Value,
}

/// The storefront app over in-memory state.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    pub kv: Arc<dyn KeyValueStore>,
}

impl TestApp {
    /// A fresh app with the seed catalog and an empty session store.
    ///
    /// # Panics
    ///
    /// Panics if the application state cannot be built.
    #[must_use]
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    /// A fresh app resuming whatever session `kv` holds.
    ///
    /// # Panics
    ///
    /// Panics if the application state cannot be built.
    #[must_use]
    pub fn with_store(kv: Arc<dyn KeyValueStore>) -> Self {
        Self::with_config(test_config(), kv)
    }

    /// A fresh app with `config`, resuming whatever session `kv` holds.
    ///
    /// # Panics
    ///
    /// Panics if the application state cannot be built.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn with_config(config: StorefrontConfig, kv: Arc<dyn KeyValueStore>) -> Self {
        let state = AppState::new(config, Arc::clone(&kv), seed::catalog())
            .expect("Failed to build application state");
        Self {
            router: app(state.clone()),
            state,
            kv,
        }
    }

    /// Send a request with an optional JSON body.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    #[allow(clippy::expect_used)]
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");
        self.send(request).await
    }

    #[allow(clippy::expect_used)]
    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), BODY_LIMIT)
            .await
            .expect("Failed to read response body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.request(Method::DELETE, uri, None).await
    }

    pub async fn patch(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::PATCH, uri, Some(body)).await
    }

    /// Send `raw` verbatim as a JSON request body.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    #[allow(clippy::expect_used)]
    pub async fn send_raw(&self, method: Method, uri: &str, raw: &str) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(raw.to_owned()))
            .expect("Failed to build request");
        self.send(request).await
    }

    /// Sign in as the configured administrator.
    pub async fn login_admin(&self) -> TestResponse {
        self.post(
            "/api/auth/login",
            serde_json::json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }),
        )
        .await
    }

    /// Sign in as a shopper.
    pub async fn login_shopper(&self) -> TestResponse {
        self.post(
            "/api/auth/login",
            serde_json::json!({ "email": "maria@correo.pe", "password": "123456" }),
        )
        .await
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
