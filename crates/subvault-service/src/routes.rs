//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{delete, get, post};
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{health, subtitles, transcript, user};
use crate::state::AppState;

/// Maximum concurrent requests for API endpoints.
const API_MAX_CONCURRENT_REQUESTS: usize = 50;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /health` - Health check
///
/// ## Transcripts (session auth)
/// - `POST /api/transcript` - Fetch a transcript, subject to quota (no request timeout)
///
/// ## User (session auth)
/// - `GET /api/user/quota` - Current quota status
/// - `GET /api/user/api-key` - Whether a personal key is stored (masked)
/// - `POST /api/user/api-key` - Store a personal key
/// - `DELETE /api/user/api-key` - Remove the personal key
///
/// ## Subtitles (session auth)
/// - `GET /api/subtitles` - List saved subtitles
/// - `POST /api/subtitles` - Save a subtitle, subject to quota
/// - `DELETE /api/subtitles/:id` - Delete a saved subtitle
pub fn create_router(state: AppState) -> Router {
    let cors_origins = state.config.cors_origins.clone();
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    let cors = build_cors_layer(&cors_origins);

    let state = Arc::new(state);

    // Provider calls are never cut short; every other route gets the timeout.
    let timed_routes = Router::new()
        .route("/user/quota", get(user::get_quota))
        .route(
            "/user/api-key",
            get(user::get_api_key)
                .post(user::save_api_key)
                .delete(user::delete_api_key),
        )
        .route(
            "/subtitles",
            get(subtitles::list_subtitles).post(subtitles::save_subtitle),
        )
        .route("/subtitles/:id", delete(subtitles::delete_subtitle))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )));

    let api_routes = Router::new()
        .route("/transcript", post(transcript::fetch_transcript))
        .merge(timed_routes)
        .layer(ConcurrencyLimitLayer::new(API_MAX_CONCURRENT_REQUESTS));

    Router::new()
        .route("/health", get(health::health))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
