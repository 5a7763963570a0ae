use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::hashtags::Platform;
use crate::services::hashtag_service::{CacheEntry, HashtagCacheStore};

pub mod migrator;
pub mod repositories;

pub use repositories::agenda::{AgendaChanges, AgendaRow, NewAgendaRow};
pub use repositories::message::{ChatMessageRow, ChatSummaryRow};

/// Fixed-width RFC 3339 in UTC, so lexical order in SQLite equals time order.
#[must_use]
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)
        .with_context(|| format!("Invalid timestamp: {value}"))?
        .with_timezone(&Utc))
}

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn hashtag_cache_repo(&self) -> repositories::hashtag_cache::HashtagCacheRepository {
        repositories::hashtag_cache::HashtagCacheRepository::new(self.conn.clone())
    }

    fn message_repo(&self) -> repositories::message::MessageRepository {
        repositories::message::MessageRepository::new(self.conn.clone())
    }

    fn agenda_repo(&self) -> repositories::agenda::AgendaRepository {
        repositories::agenda::AgendaRepository::new(self.conn.clone())
    }

    pub async fn add_message(
        &self,
        chat_id: &str,
        role: &str,
        content: &str,
        created_at: DateTime<Utc>,
    ) -> Result<ChatMessageRow> {
        self.message_repo()
            .insert(chat_id, role, content, timestamp(created_at))
            .await
    }

    pub async fn message_exists(&self, chat_id: &str, role: &str, content: &str) -> Result<bool> {
        self.message_repo().exists(chat_id, role, content).await
    }

    pub async fn count_messages(&self, chat_id: &str) -> Result<u64> {
        self.message_repo().count(chat_id).await
    }

    pub async fn get_messages(
        &self,
        chat_id: &str,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<ChatMessageRow>> {
        self.message_repo().page(chat_id, skip, limit).await
    }

    pub async fn list_chats(&self) -> Result<Vec<ChatSummaryRow>> {
        self.message_repo().summaries().await
    }

    pub async fn delete_chat(&self, chat_id: &str) -> Result<u64> {
        self.message_repo().delete_chat(chat_id).await
    }

    pub async fn add_agenda_item(&self, item: NewAgendaRow) -> Result<AgendaRow> {
        self.agenda_repo().insert(item).await
    }

    pub async fn get_agenda_item(&self, id: i32) -> Result<Option<AgendaRow>> {
        self.agenda_repo().get(id).await
    }

    pub async fn find_agenda_by_hash(&self, content_hash: &str) -> Result<Option<AgendaRow>> {
        self.agenda_repo().find_by_hash(content_hash).await
    }

    pub async fn list_agenda(&self, date: Option<&str>) -> Result<Vec<AgendaRow>> {
        self.agenda_repo().list(date).await
    }

    pub async fn update_agenda_item(
        &self,
        id: i32,
        changes: AgendaChanges,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<AgendaRow>> {
        self.agenda_repo()
            .update(id, changes, timestamp(updated_at))
            .await
    }

    pub async fn delete_agenda_item(&self, id: i32) -> Result<bool> {
        self.agenda_repo().delete(id).await
    }
}

#[async_trait]
impl HashtagCacheStore for Store {
    async fn find_fresh(
        &self,
        platform: Platform,
        now: DateTime<Utc>,
    ) -> Result<Option<CacheEntry>> {
        self.hashtag_cache_repo().find_fresh(platform, now).await
    }

    async fn upsert(&self, entry: &CacheEntry) -> Result<()> {
        self.hashtag_cache_repo().upsert(entry).await
    }

    async fn list_entries(&self) -> Result<Vec<CacheEntry>> {
        self.hashtag_cache_repo().list().await
    }

    async fn clear(&self, platform: Option<Platform>) -> Result<u64> {
        self.hashtag_cache_repo().clear(platform).await
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        self.hashtag_cache_repo().purge_expired(now).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashtags::{HashtagSet, TagOrigin};

    async fn memory_store() -> Store {
        Store::new("sqlite::memory:").await.unwrap()
    }

    fn entry(platform: Platform, tags: &[&str], now: DateTime<Utc>, hours: i64) -> CacheEntry {
        let set = HashtagSet {
            platform,
            tags: tags.iter().map(|t| (*t).to_string()).collect(),
            origin: TagOrigin::Generated,
        };
        CacheEntry::from_set(&set, now, Duration::from_secs((hours * 3600) as u64))
    }

    #[test]
    fn test_timestamps_sort_lexically() {
        let a = Utc::now();
        let b = a + chrono::Duration::milliseconds(1500);
        assert!(timestamp(a) < timestamp(b));
        assert_eq!(timestamp(a).len(), timestamp(b).len());
        let parsed = parse_timestamp(&timestamp(a)).unwrap();
        assert_eq!(parsed.timestamp_micros(), a.timestamp_micros());
    }

    #[tokio::test]
    async fn test_upsert_replaces_platform_row() {
        let store = memory_store().await;
        let now = Utc::now();

        store
            .upsert(&entry(Platform::TikTok, &["dance", "music", "pov"], now, 2))
            .await
            .unwrap();
        store
            .upsert(&entry(Platform::TikTok, &["comedy", "duet", "funny"], now, 2))
            .await
            .unwrap();

        let entries = store.list_entries().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].tags, vec!["comedy", "duet", "funny"]);
        assert!(entries[0].is_estimated);
        assert_eq!(entries[0].source, "generated");
    }

    #[tokio::test]
    async fn test_find_fresh_honours_expiry() {
        let store = memory_store().await;
        let now = Utc::now();
        store
            .upsert(&entry(Platform::X, &["news", "world", "tech"], now, 1))
            .await
            .unwrap();

        assert!(store.find_fresh(Platform::X, now).await.unwrap().is_some());
        let later = now + chrono::Duration::hours(1);
        assert!(store.find_fresh(Platform::X, later).await.unwrap().is_none());
        assert!(
            store
                .find_fresh(Platform::LinkedIn, now)
                .await
                .unwrap()
                .is_none()
        );

        assert_eq!(store.purge_expired(later).await.unwrap(), 1);
        assert!(store.list_entries().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_history_paging_and_chat_list() {
        let store = memory_store().await;
        let t0 = Utc::now();
        for i in 0..5 {
            let role = if i % 2 == 0 { "user" } else { "assistant" };
            store
                .add_message("c1", role, &format!("m{i}"), t0 + chrono::Duration::seconds(i))
                .await
                .unwrap();
        }
        store
            .add_message("c2", "assistant", "hello", t0 + chrono::Duration::seconds(10))
            .await
            .unwrap();

        assert_eq!(store.count_messages("c1").await.unwrap(), 5);
        let page = store.get_messages("c1", 3, 2).await.unwrap();
        let contents: Vec<_> = page.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["m3", "m4"]);

        let chats = store.list_chats().await.unwrap();
        assert_eq!(chats[0].chat_id, "c2");
        assert_eq!(chats[0].title, None);
        assert_eq!(chats[1].title.as_deref(), Some("m0"));

        assert_eq!(store.delete_chat("c1").await.unwrap(), 5);
        assert_eq!(store.list_chats().await.unwrap().len(), 1);
    }
}
