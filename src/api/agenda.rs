use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::validate_agenda_id;
use super::{AgendaItemDto, ApiError, ApiResponse, AppState};
use crate::services::{CreateAgendaItem, UpdateAgendaItem};

#[derive(Debug, Deserialize)]
pub struct AgendaQuery {
    pub date: Option<String>,
    #[serde(default)]
    pub all: bool,
}

/// `POST /api/agenda`
pub async fn create_item(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateAgendaItem>,
) -> Result<(StatusCode, Json<ApiResponse<AgendaItemDto>>), ApiError> {
    let item = state.shared.agenda_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(item))))
}

/// `GET /api/agenda?date=YYYY-MM-DD` or `?all=true`
pub async fn list_items(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AgendaQuery>,
) -> Result<Json<ApiResponse<Vec<AgendaItemDto>>>, ApiError> {
    let date = if query.all {
        None
    } else {
        query.date.as_deref().filter(|d| !d.trim().is_empty())
    };

    let items = state.shared.agenda_service.list(date).await?;
    Ok(Json(ApiResponse::success(items)))
}

/// `PATCH /api/agenda/{id}`
pub async fn update_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateAgendaItem>,
) -> Result<Json<ApiResponse<AgendaItemDto>>, ApiError> {
    let id = validate_agenda_id(id)?;
    let item = state.shared.agenda_service.update(id, payload).await?;
    Ok(Json(ApiResponse::success(item)))
}

/// `DELETE /api/agenda/{id}`
pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = validate_agenda_id(id)?;
    state.shared.agenda_service.delete(id).await?;
    Ok(Json(ApiResponse::success(())))
}
