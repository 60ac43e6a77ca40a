//! Transcript handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use subvault_core::TranscriptQuery;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;

/// Fetch a transcript for the caller.
///
/// Body: `{url, lang?, text?}`. The provider's payload is returned as-is.
pub async fn fetch_transcript(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ApiJson(body): ApiJson<TranscriptQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let transcript = state.transcripts.fetch(&auth.user_id, &body).await?;
    Ok(Json(transcript))
}
