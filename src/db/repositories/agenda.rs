use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::{agenda_items, prelude::*};

pub use crate::entities::agenda_items::Model as AgendaRow;

#[derive(Debug, Clone)]
pub struct NewAgendaRow {
    pub date: String,
    pub title: String,
    pub content: String,
    pub platform: String,
    pub content_hash: String,
    pub created_at: String,
}

/// Fields to overwrite; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct AgendaChanges {
    pub date: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub platform: Option<String>,
    pub content_hash: Option<String>,
}

pub struct AgendaRepository {
    conn: DatabaseConnection,
}

impl AgendaRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn insert(&self, item: NewAgendaRow) -> Result<AgendaRow> {
        let active_model = agenda_items::ActiveModel {
            date: Set(item.date),
            title: Set(item.title),
            content: Set(item.content),
            platform: Set(item.platform),
            content_hash: Set(item.content_hash),
            updated_at: Set(item.created_at.clone()),
            created_at: Set(item.created_at),
            ..Default::default()
        };

        Ok(active_model.insert(&self.conn).await?)
    }

    pub async fn get(&self, id: i32) -> Result<Option<AgendaRow>> {
        Ok(AgendaItems::find_by_id(id).one(&self.conn).await?)
    }

    pub async fn find_by_hash(&self, content_hash: &str) -> Result<Option<AgendaRow>> {
        Ok(AgendaItems::find()
            .filter(agenda_items::Column::ContentHash.eq(content_hash))
            .order_by_asc(agenda_items::Column::Id)
            .one(&self.conn)
            .await?)
    }

    /// Items for one day, or every item when `date` is `None`. Ordered by
    /// day, then most recently created first.
    pub async fn list(&self, date: Option<&str>) -> Result<Vec<AgendaRow>> {
        let mut query = AgendaItems::find();
        if let Some(date) = date {
            query = query.filter(agenda_items::Column::Date.eq(date));
        }

        Ok(query
            .order_by_asc(agenda_items::Column::Date)
            .order_by_desc(agenda_items::Column::CreatedAt)
            .order_by_desc(agenda_items::Column::Id)
            .all(&self.conn)
            .await?)
    }

    pub async fn update(
        &self,
        id: i32,
        changes: AgendaChanges,
        updated_at: String,
    ) -> Result<Option<AgendaRow>> {
        let Some(existing) = AgendaItems::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: agenda_items::ActiveModel = existing.into();
        if let Some(date) = changes.date {
            active.date = Set(date);
        }
        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(content) = changes.content {
            active.content = Set(content);
        }
        if let Some(platform) = changes.platform {
            active.platform = Set(platform);
        }
        if let Some(hash) = changes.content_hash {
            active.content_hash = Set(hash);
        }
        active.updated_at = Set(updated_at);

        Ok(Some(active.update(&self.conn).await?))
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = AgendaItems::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }
}
