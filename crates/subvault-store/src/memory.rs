//! In-memory storage implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use subvault_core::{Subtitle, SubtitleId, UserId, UserProfile};

use crate::error::Result;
use crate::{subtitle_not_found, Store};

/// Process-local store backed by hash maps.
///
/// Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    profiles: RwLock<HashMap<UserId, UserProfile>>,
    subtitles: RwLock<HashMap<SubtitleId, Subtitle>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_profile(&self, user_id: &UserId) -> Result<Option<UserProfile>> {
        Ok(self.profiles.read().await.get(user_id).cloned())
    }

    async fn put_profile(&self, profile: &UserProfile) -> Result<()> {
        self.profiles
            .write()
            .await
            .insert(profile.user_id, profile.clone());
        Ok(())
    }

    async fn insert_subtitle(&self, subtitle: &Subtitle) -> Result<()> {
        self.subtitles
            .write()
            .await
            .insert(subtitle.id, subtitle.clone());
        Ok(())
    }

    async fn list_subtitles(&self, user_id: &UserId) -> Result<Vec<Subtitle>> {
        let mut subtitles: Vec<Subtitle> = self
            .subtitles
            .read()
            .await
            .values()
            .filter(|s| &s.user_id == user_id)
            .cloned()
            .collect();

        subtitles.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(subtitles)
    }

    async fn delete_subtitle(&self, user_id: &UserId, id: &SubtitleId) -> Result<()> {
        let mut subtitles = self.subtitles.write().await;

        match subtitles.get(id) {
            Some(subtitle) if &subtitle.user_id == user_id => {
                subtitles.remove(id);
                Ok(())
            }
            _ => Err(subtitle_not_found(id)),
        }
    }

    async fn count_subtitles_since(&self, user_id: &UserId, since: DateTime<Utc>) -> Result<u64> {
        let count = self
            .subtitles
            .read()
            .await
            .values()
            .filter(|s| &s.user_id == user_id && s.created_at >= since)
            .count();

        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StoreError;
    use chrono::Duration;

    #[tokio::test]
    async fn profile_upsert_replaces() {
        let store = MemoryStore::new();
        let user_id = UserId::generate();
        assert!(store.get_profile(&user_id).await.unwrap().is_none());

        let mut profile = UserProfile::new(user_id, Some("a@example.com".into()));
        profile.set_api_key("iv:ct".into());
        store.put_profile(&profile).await.unwrap();

        profile.clear_api_key();
        store.put_profile(&profile).await.unwrap();

        let stored = store.get_profile(&user_id).await.unwrap().unwrap();
        assert_eq!(stored.encrypted_api_key, None);
        assert_eq!(stored.email.as_deref(), Some("a@example.com"));
    }

    #[tokio::test]
    async fn subtitles_list_newest_first_and_per_user() {
        let store = MemoryStore::new();
        let user_id = UserId::generate();
        let other = UserId::generate();
        let now = Utc::now();

        let old = Subtitle::new(user_id, "old".into(), "a".into())
            .with_created_at(now - Duration::hours(1));
        let new = Subtitle::new(user_id, "new".into(), "b".into()).with_created_at(now);
        let foreign = Subtitle::new(other, "theirs".into(), "c".into());

        for s in [&old, &new, &foreign] {
            store.insert_subtitle(s).await.unwrap();
        }

        let listed = store.list_subtitles(&user_id).await.unwrap();
        let titles: Vec<_> = listed.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["new", "old"]);
    }

    #[tokio::test]
    async fn count_respects_window_start() {
        let store = MemoryStore::new();
        let user_id = UserId::generate();
        let since = Utc::now() - Duration::days(1);

        let before = Subtitle::new(user_id, "before".into(), "x".into())
            .with_created_at(since - Duration::seconds(1));
        let at = Subtitle::new(user_id, "at".into(), "x".into()).with_created_at(since);
        let after = Subtitle::new(user_id, "after".into(), "x".into());

        for s in [&before, &at, &after] {
            store.insert_subtitle(s).await.unwrap();
        }

        assert_eq!(store.count_subtitles_since(&user_id, since).await.unwrap(), 2);
        assert_eq!(
            store
                .count_subtitles_since(&UserId::generate(), since)
                .await
                .unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn delete_requires_ownership() {
        let store = MemoryStore::new();
        let owner = UserId::generate();
        let subtitle = Subtitle::new(owner, "mine".into(), "x".into());
        store.insert_subtitle(&subtitle).await.unwrap();

        let result = store.delete_subtitle(&UserId::generate(), &subtitle.id).await;
        assert!(matches!(result, Err(StoreError::NotFound { .. })));

        store.delete_subtitle(&owner, &subtitle.id).await.unwrap();
        assert!(store.list_subtitles(&owner).await.unwrap().is_empty());

        let result = store.delete_subtitle(&owner, &subtitle.id).await;
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }
}
