use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use std::collections::HashMap;

use crate::entities::{chat_messages, prelude::*};

pub use crate::entities::chat_messages::Model as ChatMessageRow;

/// First message of a conversation, used to build the chat list.
#[derive(Debug, Clone)]
pub struct ChatSummaryRow {
    pub chat_id: String,
    pub title: Option<String>,
    pub created_at: String,
}

pub struct MessageRepository {
    conn: DatabaseConnection,
}

impl MessageRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn insert(
        &self,
        chat_id: &str,
        role: &str,
        content: &str,
        created_at: String,
    ) -> Result<ChatMessageRow> {
        let active_model = chat_messages::ActiveModel {
            chat_id: Set(chat_id.to_string()),
            role: Set(role.to_string()),
            content: Set(content.to_string()),
            created_at: Set(created_at),
            ..Default::default()
        };

        Ok(active_model.insert(&self.conn).await?)
    }

    pub async fn exists(&self, chat_id: &str, role: &str, content: &str) -> Result<bool> {
        let count = ChatMessages::find()
            .filter(chat_messages::Column::ChatId.eq(chat_id))
            .filter(chat_messages::Column::Role.eq(role))
            .filter(chat_messages::Column::Content.eq(content))
            .count(&self.conn)
            .await?;
        Ok(count > 0)
    }

    pub async fn count(&self, chat_id: &str) -> Result<u64> {
        Ok(ChatMessages::find()
            .filter(chat_messages::Column::ChatId.eq(chat_id))
            .count(&self.conn)
            .await?)
    }

    /// Oldest-first slice of a conversation.
    pub async fn page(&self, chat_id: &str, skip: u64, limit: u64) -> Result<Vec<ChatMessageRow>> {
        Ok(ChatMessages::find()
            .filter(chat_messages::Column::ChatId.eq(chat_id))
            .order_by_asc(chat_messages::Column::CreatedAt)
            .order_by_asc(chat_messages::Column::Id)
            .offset(skip)
            .limit(limit)
            .all(&self.conn)
            .await?)
    }

    /// One row per conversation, newest conversation first. The title is the
    /// content of the first message when that message came from the user.
    pub async fn summaries(&self) -> Result<Vec<ChatSummaryRow>> {
        let rows = ChatMessages::find()
            .order_by_asc(chat_messages::Column::CreatedAt)
            .order_by_asc(chat_messages::Column::Id)
            .all(&self.conn)
            .await?;

        let mut firsts: HashMap<String, ChatSummaryRow> = HashMap::new();
        for row in rows {
            firsts.entry(row.chat_id.clone()).or_insert_with(|| ChatSummaryRow {
                chat_id: row.chat_id,
                title: (row.role == "user").then_some(row.content),
                created_at: row.created_at,
            });
        }

        let mut summaries: Vec<ChatSummaryRow> = firsts.into_values().collect();
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(summaries)
    }

    pub async fn delete_chat(&self, chat_id: &str) -> Result<u64> {
        let result = ChatMessages::delete_many()
            .filter(chat_messages::Column::ChatId.eq(chat_id))
            .exec(&self.conn)
            .await?;
        Ok(result.rows_affected)
    }
}
