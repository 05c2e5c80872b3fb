//! Sr. Robot Storefront library.
//!
//! JSON API for the Sr. Robot tech-accessories shop: catalog, cart,
//! favorites, checkout, sign-in and the admin dashboard. Exposed as a
//! library so the router can be exercised in-process by tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod seed;
pub mod services;
pub mod state;
pub mod storage;

use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use state::AppState;

/// Build the application router over `state`.
///
/// Sentry layers are added by the binary; everything else (tracing, request
/// IDs, CORS) is part of the router so tests see the same stack.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .fallback(not_found)
        .layer(axum::middleware::from_fn(
            middleware::request_id_middleware,
        ))
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// JSON 404 for paths no route matches.
async fn not_found(uri: axum::http::Uri) -> error::AppError {
    error::AppError::NotFound(format!("No route for {}", uri.path()))
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
