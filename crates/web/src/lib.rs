//! Cooperativa web library.
//!
//! Farmer records (`agricultores`) linked to person records (`personas`):
//! free-text search, creation, drop-out and lookup, served over HTTP.
//!
//! The layers compose explicitly:
//! [`db::FarmerRepository`] -> [`services::FarmerService`] ->
//! [`state::AppState`] -> [`app`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

#[cfg(test)]
mod test_support;

use std::time::Duration;

use axum::Router;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use db::FarmerStore;
use state::AppState;

/// Build the application router over a farmer store.
///
/// Requests are traced with a per-request span recording status and latency.
/// Static files and Sentry layers are added by the binary.
pub fn app<S: FarmerStore>(state: AppState<S>) -> Router {
    routes::routes::<S>()
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, span: &Span| {
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
