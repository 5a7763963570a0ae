use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::validate_platform;
use super::{ApiError, ApiResponse, AppState, HashtagDto};

#[derive(Debug, Deserialize)]
pub struct HashtagQuery {
    pub platform: Option<String>,
    #[serde(default)]
    pub refresh: bool,
}

/// `GET /api/hashtags?platform=<p>[&refresh=true]`
pub async fn get_hashtags(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HashtagQuery>,
) -> Result<Json<ApiResponse<HashtagDto>>, ApiError> {
    let platform = validate_platform(query.platform.as_deref())?;
    let hashtags = &state.shared.hashtags;

    let result = if query.refresh {
        hashtags.refresh(platform).await
    } else {
        hashtags.get_or_refresh(platform).await
    };

    match result {
        Ok(cached) => Ok(Json(ApiResponse::success(HashtagDto::from(cached)))),
        Err(e) => Err(ApiError::hashtag_fallback(platform, e)),
    }
}

/// `GET /api/hashtags/cache`
pub async fn list_cache(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<HashtagDto>>>, ApiError> {
    let entries = state.shared.hashtags.entries().await?;
    let dtos = entries
        .into_iter()
        .map(|e| HashtagDto::from_entry(e, true))
        .collect();
    Ok(Json(ApiResponse::success(dtos)))
}
