//! Saved subtitles.
//!
//! A subtitle is a transcript the user chose to keep. Saved subtitles double as the
//! usage records counted against the monthly free tier.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{SubtitleId, UserId};

/// A transcript saved under a user's account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtitle {
    /// Unique, time-ordered identifier.
    pub id: SubtitleId,

    /// Owner of the subtitle.
    pub user_id: UserId,

    /// User-supplied title.
    pub title: String,

    /// Transcript text.
    pub content: String,

    /// Creation time from the server clock (UTC).
    pub created_at: DateTime<Utc>,
}

impl Subtitle {
    /// Create a new subtitle stamped with the current time.
    #[must_use]
    pub fn new(user_id: UserId, title: String, content: String) -> Self {
        Self {
            id: SubtitleId::generate(),
            user_id,
            title,
            content,
            created_at: Utc::now(),
        }
    }

    /// Override the creation time (backfills and tests).
    #[must_use]
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}
