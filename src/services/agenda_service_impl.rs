//! `SeaORM` implementation of the `AgendaService` trait.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::info;

use crate::api::types::{AgendaItemDto, ExistingAgendaItemDto};
use crate::db::{AgendaChanges, NewAgendaRow, Store, timestamp};
use crate::services::agenda_service::{
    AgendaError, AgendaService, CreateAgendaItem, UpdateAgendaItem, content_hash,
};
use crate::services::hashtag_service::Clock;

pub struct SeaOrmAgendaService {
    store: Store,
    clock: Arc<dyn Clock>,
}

impl SeaOrmAgendaService {
    #[must_use]
    pub fn new(store: Store, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    async fn ensure_unique(&self, hash: &str, except: Option<i32>) -> Result<(), AgendaError> {
        if let Some(existing) = self.store.find_agenda_by_hash(hash).await?
            && Some(existing.id) != except
        {
            return Err(AgendaError::Duplicate(ExistingAgendaItemDto {
                id: existing.id,
                date: existing.date,
                title: existing.title,
            }));
        }
        Ok(())
    }
}

/// Normalizes a `YYYY-MM-DD` day, rejecting anything else.
pub fn parse_day(date: &str) -> Result<String, AgendaError> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map(|d| d.format("%Y-%m-%d").to_string())
        .map_err(|_| AgendaError::Validation(format!("Invalid date '{date}', expected YYYY-MM-DD")))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[async_trait]
impl AgendaService for SeaOrmAgendaService {
    async fn create(&self, item: CreateAgendaItem) -> Result<AgendaItemDto, AgendaError> {
        let (Some(date), Some(title), Some(content), Some(platform)) = (
            non_blank(item.date),
            non_blank(item.title),
            non_blank(item.content),
            non_blank(item.platform),
        ) else {
            return Err(AgendaError::Validation(
                "All fields are required (date, title, content, platform)".to_string(),
            ));
        };

        let date = parse_day(&date)?;
        let hash = content_hash(&content);
        self.ensure_unique(&hash, None).await?;

        let row = self
            .store
            .add_agenda_item(NewAgendaRow {
                date,
                title,
                content,
                platform,
                content_hash: hash,
                created_at: timestamp(self.clock.now()),
            })
            .await?;

        info!(id = row.id, date = %row.date, "Agenda item created");
        Ok(AgendaItemDto::from(row))
    }

    async fn list(&self, date: Option<&str>) -> Result<Vec<AgendaItemDto>, AgendaError> {
        let day = date.map(parse_day).transpose()?;
        Ok(self
            .store
            .list_agenda(day.as_deref())
            .await?
            .into_iter()
            .map(AgendaItemDto::from)
            .collect())
    }

    async fn update(
        &self,
        id: i32,
        changes: UpdateAgendaItem,
    ) -> Result<AgendaItemDto, AgendaError> {
        let date = non_blank(changes.date).map(|d| parse_day(&d)).transpose()?;
        let content = non_blank(changes.content);
        let content_hash = content.as_deref().map(content_hash);

        if let Some(hash) = &content_hash {
            self.ensure_unique(hash, Some(id)).await?;
        }

        let changes = AgendaChanges {
            date,
            title: non_blank(changes.title),
            content,
            platform: non_blank(changes.platform),
            content_hash,
        };

        self.store
            .update_agenda_item(id, changes, self.clock.now())
            .await?
            .map(AgendaItemDto::from)
            .ok_or(AgendaError::NotFound(id))
    }

    async fn delete(&self, id: i32) -> Result<(), AgendaError> {
        if self.store.delete_agenda_item(id).await? {
            info!(id, "Agenda item deleted");
            Ok(())
        } else {
            Err(AgendaError::NotFound(id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::hashtag_service::SystemClock;

    async fn service() -> SeaOrmAgendaService {
        let store = Store::new("sqlite::memory:").await.unwrap();
        SeaOrmAgendaService::new(store, Arc::new(SystemClock))
    }

    fn item(date: &str, title: &str, content: &str) -> CreateAgendaItem {
        CreateAgendaItem {
            date: Some(date.to_string()),
            title: Some(title.to_string()),
            content: Some(content.to_string()),
            platform: Some("instagram".to_string()),
        }
    }

    #[tokio::test]
    async fn test_duplicate_content_is_rejected() {
        let service = service().await;
        let first = service
            .create(item("2026-03-01", "Launch", "Big launch today!"))
            .await
            .unwrap();

        let err = service
            .create(item("2026-03-05", "Again", "  BIG LAUNCH TODAY!  "))
            .await
            .unwrap_err();
        match err {
            AgendaError::Duplicate(existing) => {
                assert_eq!(existing.id, first.id);
                assert_eq!(existing.date, "2026-03-01");
                assert_eq!(existing.title, "Launch");
            }
            other => panic!("expected duplicate, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_fields_and_bad_dates() {
        let service = service().await;
        let mut missing = item("2026-03-01", "t", "c");
        missing.platform = None;
        assert!(matches!(
            service.create(missing).await,
            Err(AgendaError::Validation(_))
        ));
        assert!(matches!(
            service.create(item("03/01/2026", "t", "c")).await,
            Err(AgendaError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_list_filters_by_day() {
        let service = service().await;
        service.create(item("2026-03-02", "b", "second")).await.unwrap();
        service.create(item("2026-03-01", "a", "first")).await.unwrap();
        service.create(item("2026-03-02", "c", "third")).await.unwrap();

        let all = service.list(None).await.unwrap();
        let titles: Vec<_> = all.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "c", "b"]);

        let day = service.list(Some("2026-03-02")).await.unwrap();
        assert_eq!(day.len(), 2);
    }

    #[tokio::test]
    async fn test_partial_update_and_delete() {
        let service = service().await;
        let created = service
            .create(item("2026-03-01", "Draft", "hello world"))
            .await
            .unwrap();
        service.create(item("2026-03-01", "Other", "taken")).await.unwrap();

        let updated = service
            .update(
                created.id,
                UpdateAgendaItem {
                    title: Some("Final".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "Final");
        assert_eq!(updated.content, "hello world");

        let clash = service
            .update(
                created.id,
                UpdateAgendaItem {
                    content: Some("Taken".into()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(clash, Err(AgendaError::Duplicate(_))));

        service.delete(created.id).await.unwrap();
        assert!(matches!(
            service.delete(created.id).await,
            Err(AgendaError::NotFound(_))
        ));
        assert!(matches!(
            service.update(created.id, UpdateAgendaItem::default()).await,
            Err(AgendaError::NotFound(_))
        ));
    }
}
