//! Free-tier quota accounting.
//!
//! The quota window is the current calendar month in UTC. Every saved subtitle
//! created inside the window counts as one use.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Monthly allowance for users without a personal credential.
pub const FREE_TIER_LIMIT: u64 = 5;

/// A user's quota position, recomputed on every check.
///
/// `limit` and `remaining` are `None` when unbounded, which serializes as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaStatus {
    /// Whether a usable personal credential is stored.
    pub has_api_key: bool,
    /// Whether another use is allowed.
    pub has_quota: bool,
    /// Uses counted in the current window.
    pub used: u64,
    /// Allowance for the window (`None` = unbounded).
    pub limit: Option<u64>,
    /// Uses left in the window (`None` = unbounded).
    pub remaining: Option<u64>,
}

impl QuotaStatus {
    /// Status for a user whose personal credential bypasses counting.
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            has_api_key: true,
            has_quota: true,
            used: 0,
            limit: None,
            remaining: None,
        }
    }

    /// Status for a free-tier user with `used` uses this window.
    ///
    /// The `limit`-th use is still admitted because the check runs before the
    /// record is written; once `used == limit` nothing remains.
    #[must_use]
    pub const fn metered(limit: u64, used: u64) -> Self {
        let remaining = limit.saturating_sub(used);
        Self {
            has_api_key: false,
            has_quota: remaining > 0,
            used,
            limit: Some(limit),
            remaining: Some(remaining),
        }
    }

    /// Whether the next action may proceed.
    #[must_use]
    pub const fn admits(&self) -> bool {
        self.has_quota || self.has_api_key
    }
}

/// First instant of the calendar month containing `now` (UTC).
#[must_use]
pub fn quota_window_start(now: DateTime<Utc>) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(now.year(), now.month(), 1)
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map_or(now, |midnight| midnight.and_utc())
}
