//! Storage layer for subvault.
//!
//! This crate persists user profiles (which hold the encrypted personal credential)
//! and saved subtitles (which are counted for the monthly free tier).
//!
//! # Backends
//!
//! - [`MemoryStore`]: in-process maps, for tests and local development
//! - [`RocksStore`]: embedded `RocksDB` with column families (feature `rocksdb-backend`)
//! - [`PgStore`]: PostgreSQL via `sqlx`, with embedded migrations
//!
//! # Example
//!
//! ```no_run
//! use subvault_core::{Subtitle, UserId};
//! use subvault_store::{MemoryStore, Store};
//!
//! # async fn example() -> subvault_store::Result<()> {
//! let store = MemoryStore::new();
//! let user_id = UserId::generate();
//!
//! store
//!     .insert_subtitle(&Subtitle::new(user_id, "Intro".into(), "hello".into()))
//!     .await?;
//!
//! let saved = store.list_subtitles(&user_id).await?;
//! assert_eq!(saved.len(), 1);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod memory;
pub mod postgres;
#[cfg(feature = "rocksdb-backend")]
pub mod keys;
#[cfg(feature = "rocksdb-backend")]
pub mod rocks;
#[cfg(feature = "rocksdb-backend")]
pub mod schema;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use postgres::PgStore;
#[cfg(feature = "rocksdb-backend")]
pub use rocks::RocksStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use subvault_core::{Subtitle, SubtitleId, UserId, UserProfile};

/// The storage trait defining all database operations.
///
/// Quota enforcement reads [`Store::count_subtitles_since`] and then, in a separate
/// call, writes with [`Store::insert_subtitle`]. Nothing here makes that pair atomic,
/// so two concurrent requests from one user can both pass the check.
#[async_trait]
pub trait Store: Send + Sync {
    // =========================================================================
    // Profile Operations
    // =========================================================================

    /// Get a user's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn get_profile(&self, user_id: &UserId) -> Result<Option<UserProfile>>;

    /// Insert or replace a user's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn put_profile(&self, profile: &UserProfile) -> Result<()>;

    // =========================================================================
    // Subtitle Operations
    // =========================================================================

    /// Save a subtitle.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn insert_subtitle(&self, subtitle: &Subtitle) -> Result<()>;

    /// List a user's subtitles, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn list_subtitles(&self, user_id: &UserId) -> Result<Vec<Subtitle>>;

    /// Delete one of the user's subtitles.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the subtitle does not exist or belongs to
    /// another user.
    async fn delete_subtitle(&self, user_id: &UserId, id: &SubtitleId) -> Result<()>;

    /// Count the user's subtitles created at or after `since`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn count_subtitles_since(&self, user_id: &UserId, since: DateTime<Utc>) -> Result<u64>;
}

fn subtitle_not_found(id: &SubtitleId) -> StoreError {
    StoreError::NotFound {
        entity: "subtitle",
        id: id.to_string(),
    }
}
