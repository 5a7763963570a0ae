//! Domain service for the assistant chat: replies, history and conversations.

use crate::api::types::{ChatSummaryDto, HistoryDto, NewChatDto};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A message as sent by the chat frontend. `role` may be `ai`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("LLM request failed: {0}")]
    Llm(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for ChatError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for ChatError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait ChatService: Send + Sync {
    /// Stores any messages not seen before, asks the LLM for the next turn and
    /// stores the reply.
    async fn reply(&self, chat_id: &str, messages: Vec<IncomingMessage>)
    -> Result<String, ChatError>;

    /// Opens a conversation with a stored greeting.
    async fn start_chat(&self) -> Result<NewChatDto, ChatError>;

    /// The `limit` messages ending `offset` messages before the newest,
    /// oldest first.
    async fn history(
        &self,
        chat_id: Option<&str>,
        limit: u64,
        offset: u64,
    ) -> Result<HistoryDto, ChatError>;

    async fn list_chats(&self) -> Result<Vec<ChatSummaryDto>, ChatError>;

    /// Returns the number of messages removed.
    async fn delete_chat(&self, chat_id: &str) -> Result<u64, ChatError>;
}
