//! PostgreSQL storage implementation.
//!
//! Table layout mirrors the hosted schema the service was first deployed against:
//! `user_profiles` (one row per user) and `subtitles` (one row per saved transcript).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};

use subvault_core::{Subtitle, SubtitleId, UserId, UserProfile};

use crate::error::{Result, StoreError};
use crate::{subtitle_not_found, Store};

/// Maximum pooled connections.
const MAX_CONNECTIONS: u32 = 10;

/// PostgreSQL-backed storage implementation.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct ProfileRow {
    id: uuid::Uuid,
    email: Option<String>,
    youtube_api_key: Option<String>,
    updated_at: DateTime<Utc>,
}

impl From<ProfileRow> for UserProfile {
    fn from(row: ProfileRow) -> Self {
        Self {
            user_id: UserId::from_uuid(row.id),
            email: row.email,
            encrypted_api_key: row.youtube_api_key,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SubtitleRow {
    id: String,
    user_id: uuid::Uuid,
    title: String,
    content: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<SubtitleRow> for Subtitle {
    type Error = StoreError;

    fn try_from(row: SubtitleRow) -> Result<Self> {
        let id = row
            .id
            .parse()
            .map_err(|e| StoreError::Serialization(format!("subtitle id {}: {e}", row.id)))?;

        Ok(Self {
            id,
            user_id: UserId::from_uuid(row.user_id),
            title: row.title,
            content: row.content,
            created_at: row.created_at,
        })
    }
}

impl PgStore {
    /// Connect to the database and apply pending migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or a migration fails.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StoreError::Database(format!("migration failed: {e}")))?;

        tracing::info!("PostgreSQL store ready");

        Ok(Self { pool })
    }

    /// Wrap an existing pool without running migrations.
    ///
    /// The caller is responsible for the schema.
    #[must_use]
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn get_profile(&self, user_id: &UserId) -> Result<Option<UserProfile>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            "SELECT id, email, youtube_api_key, updated_at FROM user_profiles WHERE id = $1",
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserProfile::from))
    }

    async fn put_profile(&self, profile: &UserProfile) -> Result<()> {
        sqlx::query(
            "INSERT INTO user_profiles (id, email, youtube_api_key, updated_at) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (id) DO UPDATE SET \
                 email = EXCLUDED.email, \
                 youtube_api_key = EXCLUDED.youtube_api_key, \
                 updated_at = EXCLUDED.updated_at",
        )
        .bind(profile.user_id.as_uuid())
        .bind(&profile.email)
        .bind(&profile.encrypted_api_key)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn insert_subtitle(&self, subtitle: &Subtitle) -> Result<()> {
        sqlx::query(
            "INSERT INTO subtitles (id, user_id, title, content, created_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(subtitle.id.to_string())
        .bind(subtitle.user_id.as_uuid())
        .bind(&subtitle.title)
        .bind(&subtitle.content)
        .bind(subtitle.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_subtitles(&self, user_id: &UserId) -> Result<Vec<Subtitle>> {
        let rows = sqlx::query_as::<_, SubtitleRow>(
            "SELECT id, user_id, title, content, created_at FROM subtitles \
             WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Subtitle::try_from).collect()
    }

    async fn delete_subtitle(&self, user_id: &UserId, id: &SubtitleId) -> Result<()> {
        let result = sqlx::query("DELETE FROM subtitles WHERE id = $1 AND user_id = $2")
            .bind(id.to_string())
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(subtitle_not_found(id));
        }

        Ok(())
    }

    async fn count_subtitles_since(&self, user_id: &UserId, since: DateTime<Utc>) -> Result<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM subtitles WHERE user_id = $1 AND created_at >= $2",
        )
        .bind(user_id.as_uuid())
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        Ok(u64::try_from(count).unwrap_or_default())
    }
}
