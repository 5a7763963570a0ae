//! Domain service for the content calendar.
//!
//! Items are rejected as duplicates when their content hashes to the same
//! value as an existing item (see [`content_hash`]).

use crate::api::types::{AgendaItemDto, ExistingAgendaItemDto};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Hex SHA-256 of the trimmed, lowercased content.
#[must_use]
pub fn content_hash(content: &str) -> String {
    let normalized = content.trim().to_lowercase();
    hex::encode(Sha256::digest(normalized.as_bytes()))
}

/// Body of a create request. Fields are optional so missing ones can be
/// reported together.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateAgendaItem {
    pub date: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub platform: Option<String>,
}

/// Partial update; absent or blank fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAgendaItem {
    pub date: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub platform: Option<String>,
}

#[derive(Debug, Error)]
pub enum AgendaError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("This content is already on the agenda")]
    Duplicate(ExistingAgendaItemDto),

    #[error("Agenda item not found: {0}")]
    NotFound(i32),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for AgendaError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AgendaError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait AgendaService: Send + Sync {
    async fn create(&self, item: CreateAgendaItem) -> Result<AgendaItemDto, AgendaError>;

    /// Items for one `YYYY-MM-DD` day, or all items when `date` is `None`.
    async fn list(&self, date: Option<&str>) -> Result<Vec<AgendaItemDto>, AgendaError>;

    async fn update(&self, id: i32, changes: UpdateAgendaItem)
    -> Result<AgendaItemDto, AgendaError>;

    async fn delete(&self, id: i32) -> Result<(), AgendaError>;
}
