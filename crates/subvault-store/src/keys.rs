//! Key encoding for the `RocksDB` backend.

use subvault_core::{SubtitleId, UserId};

/// Length of a `user_id || subtitle_id` index key.
pub const USER_SUBTITLE_KEY_LEN: usize = 32;

/// Create a profile key from a user ID.
#[must_use]
pub fn profile_key(user_id: &UserId) -> Vec<u8> {
    user_id.as_bytes().to_vec()
}

/// Create a subtitle key from a subtitle ID.
#[must_use]
pub fn subtitle_key(id: &SubtitleId) -> Vec<u8> {
    id.to_bytes().to_vec()
}

/// Create a user-subtitle index key.
///
/// Format: `user_id (16 bytes) || subtitle_id (16 bytes)`. ULIDs are time-ordered,
/// so a user's entries iterate oldest first.
#[must_use]
pub fn user_subtitle_key(user_id: &UserId, id: &SubtitleId) -> Vec<u8> {
    let mut key = Vec::with_capacity(USER_SUBTITLE_KEY_LEN);
    key.extend_from_slice(user_id.as_bytes());
    key.extend_from_slice(&id.to_bytes());
    key
}

/// Prefix for iterating all of a user's subtitles.
#[must_use]
pub fn user_subtitles_prefix(user_id: &UserId) -> Vec<u8> {
    user_id.as_bytes().to_vec()
}

/// Extract the subtitle ID from a user-subtitle index key.
///
/// Returns `None` if the key is not [`USER_SUBTITLE_KEY_LEN`] bytes.
#[must_use]
pub fn subtitle_id_from_user_key(key: &[u8]) -> Option<SubtitleId> {
    if key.len() != USER_SUBTITLE_KEY_LEN {
        return None;
    }
    let bytes: [u8; 16] = key[16..].try_into().ok()?;
    Some(SubtitleId::from_bytes(bytes))
}
