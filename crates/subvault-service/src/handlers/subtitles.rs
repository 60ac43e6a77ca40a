//! Saved subtitle handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use subvault_core::{Subtitle, SubtitleId};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;

/// Subtitle list response.
#[derive(Debug, Serialize)]
pub struct SubtitleListResponse {
    /// Saved subtitles, newest first.
    pub subtitles: Vec<Subtitle>,
}

/// List the caller's saved subtitles.
pub async fn list_subtitles(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<SubtitleListResponse>, ApiError> {
    let subtitles = state.store.list_subtitles(&auth.user_id).await?;
    Ok(Json(SubtitleListResponse { subtitles }))
}

/// Save subtitle request. Missing and `null` fields are treated as blank.
#[derive(Debug, Deserialize)]
pub struct SaveSubtitleRequest {
    /// Title.
    #[serde(default)]
    pub title: Option<String>,
    /// Transcript text.
    #[serde(default)]
    pub content: Option<String>,
}

/// Saved subtitle response.
#[derive(Debug, Serialize)]
pub struct SubtitleResponse {
    /// The stored subtitle.
    pub subtitle: Subtitle,
}

/// Save a subtitle. Each save uses one unit of free-tier quota.
pub async fn save_subtitle(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ApiJson(body): ApiJson<SaveSubtitleRequest>,
) -> Result<Json<SubtitleResponse>, ApiError> {
    let (Some(title), Some(content)) = (
        body.title.filter(|t| !t.trim().is_empty()),
        body.content.filter(|c| !c.trim().is_empty()),
    ) else {
        return Err(ApiError::BadRequest(
            "Title and content are required".into(),
        ));
    };

    let quota = state.quota.evaluate(&auth.user_id).await?;
    if !quota.admits() {
        return Err(ApiError::quota_exceeded(quota));
    }

    let subtitle = Subtitle::new(auth.user_id, title, content);
    state.store.insert_subtitle(&subtitle).await?;

    tracing::info!(
        user_id = %auth.user_id,
        subtitle_id = %subtitle.id,
        used = quota.used + 1,
        "Subtitle saved"
    );

    Ok(Json(SubtitleResponse { subtitle }))
}

/// Delete one of the caller's subtitles.
pub async fn delete_subtitle(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id: SubtitleId = id
        .parse()
        .map_err(|_| ApiError::BadRequest("Invalid subtitle ID".into()))?;

    state.store.delete_subtitle(&auth.user_id, &id).await?;

    tracing::info!(user_id = %auth.user_id, subtitle_id = %id, "Subtitle deleted");

    Ok(Json(serde_json::json!({ "success": true })))
}
