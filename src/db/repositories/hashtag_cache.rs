use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::db::{parse_timestamp, timestamp};
use crate::entities::{hashtag_cache, prelude::*};
use crate::hashtags::Platform;
use crate::services::hashtag_service::CacheEntry;

pub struct HashtagCacheRepository {
    conn: DatabaseConnection,
}

impl HashtagCacheRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn find_fresh(
        &self,
        platform: Platform,
        now: DateTime<Utc>,
    ) -> Result<Option<CacheEntry>> {
        let row = HashtagCache::find()
            .filter(hashtag_cache::Column::Platform.eq(platform.as_str()))
            .filter(hashtag_cache::Column::ExpiresAt.gt(timestamp(now)))
            .one(&self.conn)
            .await?;

        row.map(Self::to_entry).transpose()
    }

    pub async fn upsert(&self, entry: &CacheEntry) -> Result<()> {
        let active_model = hashtag_cache::ActiveModel {
            platform: Set(entry.platform.as_str().to_string()),
            tags_json: Set(serde_json::to_string(&entry.tags)?),
            is_estimated: Set(entry.is_estimated),
            source: Set(entry.source.clone()),
            last_updated: Set(timestamp(entry.last_updated)),
            expires_at: Set(timestamp(entry.expires_at)),
            ..Default::default()
        };

        HashtagCache::insert(active_model)
            .on_conflict(
                OnConflict::column(hashtag_cache::Column::Platform)
                    .update_columns([
                        hashtag_cache::Column::TagsJson,
                        hashtag_cache::Column::IsEstimated,
                        hashtag_cache::Column::Source,
                        hashtag_cache::Column::LastUpdated,
                        hashtag_cache::Column::ExpiresAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.conn)
            .await?;

        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<CacheEntry>> {
        HashtagCache::find()
            .order_by_asc(hashtag_cache::Column::Platform)
            .all(&self.conn)
            .await?
            .into_iter()
            .map(Self::to_entry)
            .collect()
    }

    pub async fn clear(&self, platform: Option<Platform>) -> Result<u64> {
        let mut query = HashtagCache::delete_many();
        if let Some(platform) = platform {
            query = query.filter(hashtag_cache::Column::Platform.eq(platform.as_str()));
        }
        Ok(query.exec(&self.conn).await?.rows_affected)
    }

    pub async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let result = HashtagCache::delete_many()
            .filter(hashtag_cache::Column::ExpiresAt.lte(timestamp(now)))
            .exec(&self.conn)
            .await?;
        Ok(result.rows_affected)
    }

    fn to_entry(model: hashtag_cache::Model) -> Result<CacheEntry> {
        let platform = model
            .platform
            .parse::<Platform>()
            .with_context(|| format!("Invalid platform in hashtag cache row {}", model.id))?;
        let tags: Vec<String> = serde_json::from_str(&model.tags_json)
            .with_context(|| format!("Corrupt tag list for {platform}"))?;

        Ok(CacheEntry {
            platform,
            tags,
            is_estimated: model.is_estimated,
            source: model.source,
            last_updated: parse_timestamp(&model.last_updated)?,
            expires_at: parse_timestamp(&model.expires_at)?,
        })
    }
}
