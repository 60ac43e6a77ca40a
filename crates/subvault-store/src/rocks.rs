//! `RocksDB` storage implementation.
//!
//! Values are CBOR-encoded. Subtitles are indexed per user so listing and counting
//! only touch that user's keys.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, Direction, IteratorMode,
    MultiThreaded, Options, WriteBatch,
};

use subvault_core::{Subtitle, SubtitleId, UserId, UserProfile};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::{subtitle_not_found, Store};

/// RocksDB-backed storage implementation.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self { db: Arc::new(db) })
    }

    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn get_subtitle(&self, id: &SubtitleId) -> Result<Option<Subtitle>> {
        let cf = self.cf(cf::SUBTITLES)?;

        self.db
            .get_cf(&cf, keys::subtitle_key(id))
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    /// Subtitle IDs for a user in key order (oldest first).
    fn user_subtitle_ids(&self, user_id: &UserId) -> Result<Vec<SubtitleId>> {
        let cf_by_user = self.cf(cf::SUBTITLES_BY_USER)?;
        let prefix = keys::user_subtitles_prefix(user_id);

        let iter = self
            .db
            .iterator_cf(&cf_by_user, IteratorMode::From(&prefix, Direction::Forward));

        let mut ids = Vec::new();
        for item in iter {
            let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;

            if !key.starts_with(&prefix) {
                break;
            }

            match keys::subtitle_id_from_user_key(&key) {
                Some(id) => ids.push(id),
                None => tracing::warn!(len = key.len(), "Skipping malformed subtitle index key"),
            }
        }

        Ok(ids)
    }

    fn user_subtitles(&self, user_id: &UserId) -> Result<Vec<Subtitle>> {
        let mut subtitles = Vec::new();
        for id in self.user_subtitle_ids(user_id)? {
            if let Some(subtitle) = self.get_subtitle(&id)? {
                subtitles.push(subtitle);
            }
        }
        Ok(subtitles)
    }
}

#[async_trait]
impl Store for RocksStore {
    async fn get_profile(&self, user_id: &UserId) -> Result<Option<UserProfile>> {
        let cf = self.cf(cf::PROFILES)?;

        self.db
            .get_cf(&cf, keys::profile_key(user_id))
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    async fn put_profile(&self, profile: &UserProfile) -> Result<()> {
        let cf = self.cf(cf::PROFILES)?;
        let value = Self::serialize(profile)?;

        self.db
            .put_cf(&cf, keys::profile_key(&profile.user_id), value)
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    async fn insert_subtitle(&self, subtitle: &Subtitle) -> Result<()> {
        let cf_subtitles = self.cf(cf::SUBTITLES)?;
        let cf_by_user = self.cf(cf::SUBTITLES_BY_USER)?;
        let value = Self::serialize(subtitle)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_subtitles, keys::subtitle_key(&subtitle.id), &value);
        batch.put_cf(
            &cf_by_user,
            keys::user_subtitle_key(&subtitle.user_id, &subtitle.id),
            [],
        );

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    async fn list_subtitles(&self, user_id: &UserId) -> Result<Vec<Subtitle>> {
        let mut subtitles = self.user_subtitles(user_id)?;
        subtitles.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(subtitles)
    }

    async fn delete_subtitle(&self, user_id: &UserId, id: &SubtitleId) -> Result<()> {
        match self.get_subtitle(id)? {
            Some(subtitle) if &subtitle.user_id == user_id => {}
            _ => return Err(subtitle_not_found(id)),
        }

        let cf_subtitles = self.cf(cf::SUBTITLES)?;
        let cf_by_user = self.cf(cf::SUBTITLES_BY_USER)?;

        let mut batch = WriteBatch::default();
        batch.delete_cf(&cf_subtitles, keys::subtitle_key(id));
        batch.delete_cf(&cf_by_user, keys::user_subtitle_key(user_id, id));

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    async fn count_subtitles_since(&self, user_id: &UserId, since: DateTime<Utc>) -> Result<u64> {
        let count = self
            .user_subtitles(user_id)?
            .iter()
            .filter(|s| s.created_at >= since)
            .count();

        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

    fn create_test_store() -> (RocksStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = RocksStore::open(dir.path()).unwrap();
        (store, dir)
    }

    #[tokio::test]
    async fn profile_roundtrip_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let user_id = UserId::generate();

        {
            let store = RocksStore::open(dir.path()).unwrap();
            let mut profile = UserProfile::new(user_id, None);
            profile.set_api_key("aXY=:Y3Q=".into());
            store.put_profile(&profile).await.unwrap();
        }

        let store = RocksStore::open(dir.path()).unwrap();
        let profile = store.get_profile(&user_id).await.unwrap().unwrap();
        assert_eq!(profile.stored_api_key(), Some("aXY=:Y3Q="));
    }

    #[tokio::test]
    async fn subtitles_are_listed_newest_first() {
        let (store, _dir) = create_test_store();
        let user_id = UserId::generate();

        let first = Subtitle::new(user_id, "first".into(), "a".into());
        store.insert_subtitle(&first).await.unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2)); // distinct ULID timestamps
        let second = Subtitle::new(user_id, "second".into(), "b".into());
        store.insert_subtitle(&second).await.unwrap();

        store
            .insert_subtitle(&Subtitle::new(UserId::generate(), "other".into(), "c".into()))
            .await
            .unwrap();

        let listed = store.list_subtitles(&user_id).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].title, "second");
        assert_eq!(listed[1].title, "first");
    }

    #[tokio::test]
    async fn count_and_delete() {
        let (store, _dir) = create_test_store();
        let user_id = UserId::generate();
        let since = Utc::now() - Duration::days(3);

        let stale = Subtitle::new(user_id, "stale".into(), "x".into())
            .with_created_at(since - Duration::days(1));
        let fresh = Subtitle::new(user_id, "fresh".into(), "y".into());
        store.insert_subtitle(&stale).await.unwrap();
        store.insert_subtitle(&fresh).await.unwrap();

        assert_eq!(store.count_subtitles_since(&user_id, since).await.unwrap(), 1);

        let denied = store.delete_subtitle(&UserId::generate(), &fresh.id).await;
        assert!(matches!(denied, Err(StoreError::NotFound { .. })));

        store.delete_subtitle(&user_id, &fresh.id).await.unwrap();
        assert_eq!(store.count_subtitles_since(&user_id, since).await.unwrap(), 0);
        assert_eq!(store.list_subtitles(&user_id).await.unwrap().len(), 1);
    }
}
