//! Column families used by the `RocksDB` backend.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// User profiles, keyed by `user_id`.
    pub const PROFILES: &str = "profiles";

    /// Saved subtitles, keyed by `subtitle_id` (ULID).
    pub const SUBTITLES: &str = "subtitles";

    /// Index: subtitles by user, keyed by `user_id || subtitle_id`.
    /// Value is empty (index only).
    pub const SUBTITLES_BY_USER: &str = "subtitles_by_user";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![cf::PROFILES, cf::SUBTITLES, cf::SUBTITLES_BY_USER]
}
