//! Transcript request orchestration.
//!
//! A request runs straight through: validate input, check quota, pick a
//! credential, call the provider once. There are no retries.

mod client;

pub use client::{ProviderError, TranscriptClient};

use axum::http::StatusCode;

use subvault_core::{QuotaStatus, TranscriptQuery, UserId};
use subvault_store::StoreError;

use crate::credentials::CredentialResolver;
use crate::error::ApiError;
use crate::quota::QuotaEvaluator;

/// Shown when the provider rejects a request made with the user's own key.
pub const PERSONAL_KEY_FAILURE_MESSAGE: &str =
    "Failed to fetch transcript with your API key. Please check that the key is valid and has remaining credits.";

/// Shown when the provider rejects a request made with the server key.
pub const UPSTREAM_FAILURE_MESSAGE: &str =
    "Failed to fetch transcript. Please check the URL and try again.";

/// Shown when neither a personal nor a server key is available.
pub const MISSING_KEY_MESSAGE: &str =
    "API key is not configured. Please check your environment variables.";

/// Ways a transcript request can end without a transcript.
#[derive(Debug, thiserror::Error)]
pub enum TranscriptError {
    /// The request is malformed.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// Free tier exhausted and no personal credential.
    #[error("quota exceeded")]
    QuotaExceeded {
        /// Quota at the time of the check.
        quota: QuotaStatus,
    },

    /// No credential of any kind is available.
    #[error("no transcript API key available")]
    MissingCredential,

    /// The provider answered with a non-success status.
    #[error("provider returned {status}")]
    Upstream {
        /// Provider status code.
        status: StatusCode,
        /// Whether the user's own key was used.
        personal_key: bool,
    },

    /// The provider could not be reached or answered with unreadable JSON.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),

    /// Profile or usage store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<TranscriptError> for ApiError {
    fn from(err: TranscriptError) -> Self {
        match err {
            TranscriptError::InvalidInput(msg) => Self::BadRequest(msg.to_string()),
            TranscriptError::QuotaExceeded { quota } => Self::quota_exceeded(quota),
            TranscriptError::MissingCredential => {
                Self::Configuration(MISSING_KEY_MESSAGE.to_string())
            }
            TranscriptError::Upstream {
                status,
                personal_key,
            } => Self::Upstream {
                status,
                message: if personal_key {
                    PERSONAL_KEY_FAILURE_MESSAGE
                } else {
                    UPSTREAM_FAILURE_MESSAGE
                }
                .to_string(),
            },
            TranscriptError::Transport(e) => Self::Internal(e.to_string()),
            TranscriptError::Store(e) => e.into(),
        }
    }
}

/// Decides whether a transcript fetch may run, and with which key, then runs it.
#[derive(Clone)]
pub struct TranscriptService {
    quota: QuotaEvaluator,
    credentials: CredentialResolver,
    client: TranscriptClient,
    default_api_key: Option<String>,
}

impl TranscriptService {
    /// Create the orchestrator.
    ///
    /// `default_api_key` is the server's own provider key, used for users without
    /// a readable personal key.
    #[must_use]
    pub fn new(
        quota: QuotaEvaluator,
        credentials: CredentialResolver,
        client: TranscriptClient,
        default_api_key: Option<String>,
    ) -> Self {
        Self {
            quota,
            credentials,
            client,
            default_api_key: default_api_key.filter(|k| !k.is_empty()),
        }
    }

    /// Fetch a transcript for `user_id`.
    ///
    /// On success the provider's JSON body is returned unchanged.
    pub async fn fetch(
        &self,
        user_id: &UserId,
        query: &TranscriptQuery,
    ) -> Result<serde_json::Value, TranscriptError> {
        if query.url.trim().is_empty() {
            return Err(TranscriptError::InvalidInput("YouTube URL is required"));
        }

        let credential = self.credentials.lookup(user_id).await?;
        let quota = self.quota.evaluate_with(user_id, &credential).await?;
        if !quota.admits() {
            tracing::info!(user_id = %user_id, used = quota.used, "Transcript denied - quota exhausted");
            return Err(TranscriptError::QuotaExceeded { quota });
        }

        let (api_key, personal_key) = match (credential.into_option(), &self.default_api_key) {
            (Some(personal), _) => (personal, true),
            (None, Some(default)) => (default.clone(), false),
            (None, None) => return Err(TranscriptError::MissingCredential),
        };

        tracing::debug!(
            user_id = %user_id,
            lang = %query.lang,
            text = query.text,
            personal_key,
            "Requesting transcript"
        );

        match self.client.fetch(query, &api_key).await {
            Ok(body) => {
                tracing::info!(user_id = %user_id, personal_key, "Transcript fetched");
                Ok(body)
            }
            Err(ProviderError::Status { status, body }) => {
                tracing::warn!(
                    user_id = %user_id,
                    status = %status,
                    personal_key,
                    body = %body,
                    "Transcript provider rejected request"
                );
                Err(TranscriptError::Upstream {
                    status,
                    personal_key,
                })
            }
            Err(ProviderError::Http(e)) => {
                tracing::error!(user_id = %user_id, error = %e, "Transcript provider unreachable");
                Err(TranscriptError::Transport(e))
            }
        }
    }
}
