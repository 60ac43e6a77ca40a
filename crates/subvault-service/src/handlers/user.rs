//! Quota and personal API key handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use subvault_core::{QuotaStatus, UserProfile};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;

/// Placeholder returned instead of the stored key.
pub const API_KEY_MASK: &str = "••••••••";

/// Get the caller's quota status.
pub async fn get_quota(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<QuotaStatus>, ApiError> {
    let quota = state.quota.evaluate(&auth.user_id).await?;
    Ok(Json(quota))
}

/// API key status response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyResponse {
    /// Whether a usable key is stored.
    pub has_api_key: bool,
    /// Masked key, or `null`.
    pub api_key: Option<&'static str>,
}

/// Report whether the caller has a personal key, without revealing it.
pub async fn get_api_key(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<ApiKeyResponse>, ApiError> {
    let has_api_key = state.credentials.lookup(&auth.user_id).await?.is_present();

    Ok(Json(ApiKeyResponse {
        has_api_key,
        api_key: has_api_key.then_some(API_KEY_MASK),
    }))
}

/// Save API key request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveApiKeyRequest {
    /// The plaintext provider key.
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Encrypt and store the caller's personal key.
pub async fn save_api_key(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ApiJson(body): ApiJson<SaveApiKeyRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let api_key = body
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .ok_or_else(|| ApiError::BadRequest("API Key is required".into()))?;

    let mut profile = state
        .store
        .get_profile(&auth.user_id)
        .await?
        .unwrap_or_else(|| UserProfile::new(auth.user_id, auth.email.clone()));

    if auth.email.is_some() {
        profile.email.clone_from(&auth.email);
    }
    profile.set_api_key(state.credentials.seal(api_key));

    state.store.put_profile(&profile).await?;

    tracing::info!(user_id = %auth.user_id, "Personal API key saved");

    Ok(Json(serde_json::json!({ "success": true })))
}

/// Remove the caller's personal key.
pub async fn delete_api_key(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    if let Some(mut profile) = state.store.get_profile(&auth.user_id).await? {
        profile.clear_api_key();
        state.store.put_profile(&profile).await?;
        tracing::info!(user_id = %auth.user_id, "Personal API key removed");
    }

    Ok(Json(serde_json::json!({ "success": true })))
}
