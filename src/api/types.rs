use serde::{Deserialize, Serialize};

use crate::db::{AgendaRow, ChatMessageRow, ChatSummaryRow};
use crate::services::hashtag_service::{CachedHashtags, CacheEntry};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    /// A failed request that still carries a usable payload.
    pub fn failure(data: T, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: Some(data),
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct HashtagDto {
    pub platform: String,
    pub hashtags: Vec<String>,
    pub is_estimated: bool,
    pub cached: bool,
    pub last_updated: String,
    pub source: String,
}

impl HashtagDto {
    #[must_use]
    pub fn from_entry(entry: CacheEntry, cached: bool) -> Self {
        Self {
            platform: entry.platform.as_str().to_string(),
            hashtags: entry.tags,
            is_estimated: entry.is_estimated,
            cached,
            last_updated: entry.last_updated.to_rfc3339(),
            source: entry.source,
        }
    }
}

impl From<CachedHashtags> for HashtagDto {
    fn from(result: CachedHashtags) -> Self {
        Self::from_entry(result.entry, result.cached)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageDto {
    pub id: i32,
    pub chat_id: String,
    pub role: String,
    pub content: String,
    pub created_at: String,
}

impl From<ChatMessageRow> for ChatMessageDto {
    fn from(row: ChatMessageRow) -> Self {
        Self {
            id: row.id,
            chat_id: row.chat_id,
            role: row.role,
            content: row.content,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HistoryDto {
    pub messages: Vec<ChatMessageDto>,
    pub total: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ChatSummaryDto {
    pub chat_id: String,
    pub title: String,
    pub created_at: String,
}

impl From<ChatSummaryRow> for ChatSummaryDto {
    fn from(row: ChatSummaryRow) -> Self {
        Self {
            chat_id: row.chat_id,
            title: row.title.unwrap_or_else(|| "New chat".to_string()),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewChatDto {
    pub chat_id: String,
    pub message: ChatMessageDto,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChatReplyDto {
    pub reply: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AgendaItemDto {
    pub id: i32,
    pub date: String,
    pub title: String,
    pub content: String,
    pub platform: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<AgendaRow> for AgendaItemDto {
    fn from(row: AgendaRow) -> Self {
        Self {
            id: row.id,
            date: row.date,
            title: row.title,
            content: row.content,
            platform: row.platform,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// The item a rejected duplicate collided with.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ExistingAgendaItemDto {
    pub id: i32,
    pub date: String,
    pub title: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateAgendaDto {
    pub existing_item: ExistingAgendaItemDto,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SystemStatus {
    pub version: String,
    pub uptime_seconds: u64,
    pub database_ok: bool,
    pub llm_configured: bool,
}
