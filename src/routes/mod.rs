//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! `/auth/*` is open. Everything under `/api` requires a bearer token, which
//! the `AuthUser` extractor from [`gate`] enforces per handler. Each request
//! gets an `x-request-id` (kept if the client sent one), a tracing span
//! carrying it, and an end-to-end timeout. A panicking handler answers 500
//! with the usual error envelope.

pub mod auth;
pub mod books;
pub mod error;
pub mod gate;
pub mod lists;

use std::time::Duration;

use axum::Router;
use axum::http::{HeaderName, Request, StatusCode};
use axum::routing::{get, post};
use serde::Serialize;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Body of successful updates and deletes.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

impl StatusResponse {
    #[must_use]
    pub fn ok() -> Self {
        Self { status: "OK" }
    }
}

/// Build the full router with middleware.
pub fn app(state: AppState, request_timeout: Duration) -> Router {
    with_middleware(api_routes().with_state(state), request_timeout)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/sign-up", post(auth::sign_up))
        .route("/auth/sign-in", post(auth::sign_in))
        .route("/api/lists", get(lists::get_lists).post(lists::create_list))
        .route(
            "/api/lists/{id}",
            get(lists::get_list)
                .put(lists::update_list)
                .delete(lists::delete_list),
        )
        .route("/api/lists/{id}/books", get(books::get_books).post(books::create_book))
        .route(
            "/api/books/{id}",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        .route("/healthz", get(healthz))
}

/// Wrap `router` in the per-request stack, innermost first: panic recovery,
/// timeout, request-id propagation, tracing, request-id assignment, CORS.
fn with_middleware(router: Router, request_timeout: Duration) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace = TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
        let request_id = request
            .headers()
            .get(&REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        tracing::info_span!(
            "http.request",
            method = %request.method(),
            path = %request.uri().path(),
            request_id = %request_id,
        )
    });

    router
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, request_timeout))
        .layer(PropagateRequestIdLayer::new(REQUEST_ID_HEADER))
        .layer(trace)
        .layer(SetRequestIdLayer::new(REQUEST_ID_HEADER, MakeRequestUuid))
        .layer(cors)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
