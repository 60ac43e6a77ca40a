//! Session authentication.
//!
//! Login and registration happen at the identity provider. Requests carry the
//! provider's HS256 access token either as `Authorization: Bearer <jwt>` or in the
//! `sb-access-token` cookie; the [`AuthUser`] extractor validates it and yields the
//! caller's identity.

use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use subvault_core::UserId;

use crate::config::ServiceConfig;
use crate::error::ApiError;
use crate::state::AppState;

/// Cookie the identity provider's client library stores the access token in.
pub const ACCESS_TOKEN_COOKIE: &str = "sb-access-token";

/// An authenticated user extracted from the session token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user ID.
    pub user_id: UserId,
    /// Email claim, if present.
    pub email: Option<String>,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .or_else(|| cookie_token(parts))
            .ok_or(ApiError::Unauthorized)?;

        let claims = validate_jwt(token, &state.config)?;

        let user_id = claims.sub.parse::<UserId>().map_err(|_| {
            tracing::debug!(sub = %claims.sub, "JWT subject is not a user ID");
            ApiError::Unauthorized
        })?;

        Ok(AuthUser {
            user_id,
            email: claims.email,
        })
    }
}

/// JWT claims issued by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (user ID).
    pub sub: String,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Audience (can be string or array).
    #[serde(default)]
    pub aud: Option<serde_json::Value>,
    /// Issuer.
    #[serde(default)]
    pub iss: Option<String>,
    /// Expiration time.
    pub exp: i64,
    /// Role, e.g. "authenticated".
    #[serde(default)]
    pub role: Option<String>,
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn cookie_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == ACCESS_TOKEN_COOKIE)
        .map(|(_, value)| value)
        .filter(|t| !t.is_empty())
}

/// Validate a session token against the configured secret.
fn validate_jwt(token: &str, config: &ServiceConfig) -> Result<JwtClaims, ApiError> {
    let Some(secret) = config.auth_jwt_secret.as_deref() else {
        tracing::warn!("AUTH_JWT_SECRET not configured - rejecting all sessions");
        return Err(ApiError::Unauthorized);
    };

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[&config.auth_audience]);
    if let Some(issuer) = &config.auth_issuer {
        validation.set_issuer(&[issuer]);
    }

    let token_data = decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!(error = %e, "JWT validation failed");
        ApiError::Unauthorized
    })?;

    Ok(token_data.claims)
}
