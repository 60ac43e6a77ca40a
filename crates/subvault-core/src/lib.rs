//! Core types for subvault.
//!
//! This crate provides the types shared by the store and the HTTP service:
//!
//! - **Identifiers**: `UserId`, `SubtitleId`
//! - **Profiles**: `UserProfile` (holds the encrypted personal credential)
//! - **Subtitles**: `Subtitle`, a saved transcript; each one counts as a usage record
//! - **Quota**: `QuotaStatus` and the monthly quota window
//! - **Transcripts**: `TranscriptQuery` and the provider payload shapes
//!
//! # Free Tier
//!
//! Users without a personal credential may save [`FREE_TIER_LIMIT`] subtitles per
//! calendar month (UTC). A stored personal credential lifts the limit entirely.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ids;
pub mod profile;
pub mod quota;
pub mod subtitle;
pub mod transcript;

pub use ids::{IdError, SubtitleId, UserId};
pub use profile::UserProfile;
pub use quota::{quota_window_start, QuotaStatus, FREE_TIER_LIMIT};
pub use subtitle::Subtitle;
pub use transcript::{TranscriptQuery, TranscriptSegment, TranscriptText, DEFAULT_LANG};
