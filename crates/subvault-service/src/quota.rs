//! Free-tier quota evaluation.

use std::sync::Arc;

use chrono::Utc;

use subvault_core::{quota_window_start, QuotaStatus, UserId};
use subvault_store::{Store, StoreError};

use crate::credentials::{CredentialResolver, StoredCredential};

/// Computes a user's quota position against the configured monthly limit.
///
/// The check reads the current count and the caller writes the next usage record
/// afterwards; concurrent requests from one user may both be admitted.
#[derive(Clone)]
pub struct QuotaEvaluator {
    store: Arc<dyn Store>,
    credentials: CredentialResolver,
    limit: u64,
}

impl QuotaEvaluator {
    /// Create an evaluator with a monthly `limit`.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, credentials: CredentialResolver, limit: u64) -> Self {
        Self {
            store,
            credentials,
            limit,
        }
    }

    /// The configured monthly limit.
    #[must_use]
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Evaluate the user's quota, looking up their credential first.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile or usage store fails.
    pub async fn evaluate(&self, user_id: &UserId) -> Result<QuotaStatus, StoreError> {
        let credential = self.credentials.lookup(user_id).await?;
        self.evaluate_with(user_id, &credential).await
    }

    /// Evaluate the user's quota given an already-resolved credential.
    ///
    /// A usable personal credential short-circuits with an unlimited status and no
    /// usage count is taken.
    ///
    /// # Errors
    ///
    /// Returns an error if the usage store fails.
    pub async fn evaluate_with(
        &self,
        user_id: &UserId,
        credential: &StoredCredential,
    ) -> Result<QuotaStatus, StoreError> {
        if credential.is_present() {
            return Ok(QuotaStatus::unlimited());
        }

        let since = quota_window_start(Utc::now());
        let used = self.store.count_subtitles_since(user_id, since).await?;
        let status = QuotaStatus::metered(self.limit, used);

        tracing::debug!(
            user_id = %user_id,
            used = status.used,
            limit = self.limit,
            "Quota evaluated"
        );

        Ok(status)
    }
}

/// Message shown when a free-tier user has no uses left.
#[must_use]
pub fn quota_exceeded_message(limit: u64) -> String {
    format!(
        "You have used all {limit} free transcripts this month. \
         Add your own API key to keep going."
    )
}
