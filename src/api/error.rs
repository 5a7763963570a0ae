use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::types::{DuplicateAgendaDto, ExistingAgendaItemDto, HashtagDto};
use super::ApiResponse;
use crate::hashtags::UnknownPlatform;
use crate::services::{AgendaError, ChatError, HashtagError};

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    DatabaseError(String),

    ExternalApiError { service: String, message: String },

    ValidationError(String),

    /// Agenda content collided with an existing item.
    DuplicateAgendaItem(ExistingAgendaItemDto),

    /// The hashtag cache failed; the body still carries usable tags.
    HashtagFallback { message: String, payload: HashtagDto },

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            ApiError::ExternalApiError { service, message } => {
                write!(f, "{} error: {}", service, message)
            }
            ApiError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ApiError::DuplicateAgendaItem(existing) => {
                write!(f, "Duplicate of agenda item {}", existing.id)
            }
            ApiError::HashtagFallback { message, .. } => {
                write!(f, "Hashtag cache error: {}", message)
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::DuplicateAgendaItem(existing_item) => {
                let body = ApiResponse::failure(
                    DuplicateAgendaDto { existing_item },
                    "This content has already been added to the agenda",
                );
                return (StatusCode::CONFLICT, Json(body)).into_response();
            }
            ApiError::HashtagFallback { message, payload } => {
                tracing::error!("Hashtag cache error: {}", message);
                let body = ApiResponse::failure(payload, "Hashtags could not be loaded");
                return (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response();
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            ApiError::ExternalApiError { service, message } => {
                tracing::warn!("{} API error: {}", service, message);
                (
                    StatusCode::BAD_GATEWAY,
                    format!("{} service is unavailable", service),
                )
            }
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ApiResponse::<()>::error(error_message);
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl From<UnknownPlatform> for ApiError {
    fn from(err: UnknownPlatform) -> Self {
        ApiError::ValidationError(err.to_string())
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::Validation(msg) => Self::validation(msg),
            ChatError::Llm(message) => Self::ExternalApiError {
                service: "LLM".to_string(),
                message,
            },
            ChatError::Database(msg) => Self::DatabaseError(msg),
        }
    }
}

impl From<AgendaError> for ApiError {
    fn from(err: AgendaError) -> Self {
        match err {
            AgendaError::Validation(msg) => Self::validation(msg),
            AgendaError::Duplicate(existing) => Self::DuplicateAgendaItem(existing),
            AgendaError::NotFound(id) => Self::not_found("Agenda item", id),
            AgendaError::Database(msg) => Self::DatabaseError(msg),
        }
    }
}

impl ApiError {
    /// Maps a cache failure for `platform` to a 500 that still carries tags.
    pub fn hashtag_fallback(platform: crate::hashtags::Platform, err: HashtagError) -> Self {
        let HashtagError::Persistence {
            message,
            fallback,
            is_estimated,
        } = err;

        ApiError::HashtagFallback {
            message,
            payload: HashtagDto {
                platform: platform.as_str().to_string(),
                hashtags: fallback,
                is_estimated,
                cached: false,
                last_updated: chrono::Utc::now().to_rfc3339(),
                source: "fallback".to_string(),
            },
        }
    }

    pub fn not_found(resource: &str, id: impl fmt::Display) -> Self {
        ApiError::NotFound(format!("{} {} not found", resource, id))
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::ValidationError(msg.into())
    }
}
