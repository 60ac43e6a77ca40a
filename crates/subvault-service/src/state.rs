//! Application state.

use std::sync::Arc;

use subvault_store::Store;

use crate::config::ServiceConfig;
use crate::credentials::CredentialResolver;
use crate::crypto::CredentialCipher;
use crate::quota::QuotaEvaluator;
use crate::transcript::{ProviderError, TranscriptClient, TranscriptService};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The storage backend.
    pub store: Arc<dyn Store>,

    /// Service configuration.
    pub config: ServiceConfig,

    /// Personal credential lookup and sealing.
    pub credentials: CredentialResolver,

    /// Free-tier quota evaluation.
    pub quota: QuotaEvaluator,

    /// Transcript request orchestration.
    pub transcripts: TranscriptService,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the transcript provider client cannot be built.
    pub fn new(store: Arc<dyn Store>, config: ServiceConfig) -> Result<Self, ProviderError> {
        let cipher = CredentialCipher::new(&config.credential_secret);
        let credentials = CredentialResolver::new(store.clone(), cipher);
        let quota = QuotaEvaluator::new(store.clone(), credentials.clone(), config.free_tier_limit);

        let client = TranscriptClient::new(&config.transcript_api_url)?;
        tracing::info!(url = %config.transcript_api_url, "Transcript provider configured");

        if config.transcript_api_key.is_none() {
            tracing::warn!("SUPADATA_API_KEY not set - only users with their own key can fetch transcripts");
        }

        let transcripts = TranscriptService::new(
            quota.clone(),
            credentials.clone(),
            client,
            config.transcript_api_key.clone(),
        );

        Ok(Self {
            store,
            config,
            credentials,
            quota,
            transcripts,
        })
    }
}
