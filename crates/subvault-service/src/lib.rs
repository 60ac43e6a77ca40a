//! Subvault HTTP API Service.
//!
//! This crate provides the HTTP API for subvault, including:
//!
//! - Transcript fetching through an external provider
//! - Monthly free-tier quota enforcement
//! - Personal provider keys, encrypted at rest
//! - Saved subtitles
//!
//! # Authentication
//!
//! All `/api` routes require a session token issued by the identity provider,
//! sent either as a Bearer token or in the `sb-access-token` cookie.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)]

pub mod auth;
pub mod config;
pub mod credentials;
pub mod crypto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod quota;
pub mod routes;
pub mod state;
pub mod transcript;

pub use config::ServiceConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
