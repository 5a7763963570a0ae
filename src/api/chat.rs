use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::validate_limit;
use super::{
    ApiError, ApiResponse, AppState, ChatReplyDto, ChatSummaryDto, HistoryDto, NewChatDto,
};
use crate::services::IncomingMessage;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub chat_id: Option<String>,
    #[serde(default)]
    pub messages: Vec<IncomingMessage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub chat_id: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatIdQuery {
    pub chat_id: Option<String>,
}

#[derive(Debug, serde::Serialize)]
pub struct DeletedChat {
    pub removed: u64,
}

/// `POST /api/chat`
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ApiResponse<ChatReplyDto>>, ApiError> {
    let chat_id = payload
        .chat_id
        .ok_or_else(|| ApiError::validation("chatId is required"))?;

    let reply = state
        .shared
        .chat_service
        .reply(&chat_id, payload.messages)
        .await?;

    Ok(Json(ApiResponse::success(ChatReplyDto { reply })))
}

/// `POST /api/chats`
pub async fn new_chat(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<NewChatDto>>, ApiError> {
    let chat = state.shared.chat_service.start_chat().await?;
    Ok(Json(ApiResponse::success(chat)))
}

/// `GET /api/history?chatId=&limit=20&offset=0`
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<ApiResponse<HistoryDto>>, ApiError> {
    let limit = validate_limit(query.limit.unwrap_or(20))?;
    let offset = query.offset.unwrap_or(0);

    let history = state
        .shared
        .chat_service
        .history(query.chat_id.as_deref(), limit, offset)
        .await?;

    Ok(Json(ApiResponse::success(history)))
}

/// `GET /api/chats`
pub async fn list_chats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<ChatSummaryDto>>>, ApiError> {
    let chats = state.shared.chat_service.list_chats().await?;
    Ok(Json(ApiResponse::success(chats)))
}

/// `DELETE /api/chats?chatId=`
pub async fn delete_chat(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ChatIdQuery>,
) -> Result<Json<ApiResponse<DeletedChat>>, ApiError> {
    let chat_id = query
        .chat_id
        .ok_or_else(|| ApiError::validation("chatId is required"))?;

    let removed = state.shared.chat_service.delete_chat(&chat_id).await?;
    Ok(Json(ApiResponse::success(DeletedChat { removed })))
}
