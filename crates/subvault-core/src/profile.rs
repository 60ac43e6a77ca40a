//! User profile records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::UserId;

/// Per-user settings, one record per user.
///
/// Created lazily the first time a user saves a personal credential and never
/// deleted by subvault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// The user this profile belongs to.
    pub user_id: UserId,

    /// Email from the identity provider, if it supplied one.
    pub email: Option<String>,

    /// Personal transcript-provider credential in `base64(iv):base64(ciphertext)` form.
    pub encrypted_api_key: Option<String>,

    /// When the profile was last written.
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Create an empty profile.
    #[must_use]
    pub fn new(user_id: UserId, email: Option<String>) -> Self {
        Self {
            user_id,
            email,
            encrypted_api_key: None,
            updated_at: Utc::now(),
        }
    }

    /// The stored ciphertext, treating an empty string as absent.
    #[must_use]
    pub fn stored_api_key(&self) -> Option<&str> {
        self.encrypted_api_key
            .as_deref()
            .filter(|key| !key.is_empty())
    }

    /// Replace the stored credential.
    pub fn set_api_key(&mut self, encrypted: String) {
        self.encrypted_api_key = Some(encrypted);
        self.updated_at = Utc::now();
    }

    /// Remove the stored credential.
    pub fn clear_api_key(&mut self) {
        self.encrypted_api_key = None;
        self.updated_at = Utc::now();
    }
}
