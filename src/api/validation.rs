use super::ApiError;
use crate::hashtags::{Platform, UnknownPlatform};

pub fn validate_platform(platform: Option<&str>) -> Result<Platform, ApiError> {
    let Some(raw) = platform.filter(|p| !p.trim().is_empty()) else {
        return Err(ApiError::validation(format!(
            "Missing platform parameter. Valid platforms: {}",
            Platform::valid_values()
        )));
    };
    Platform::from_identifier(raw)
        .ok_or_else(|| ApiError::from(UnknownPlatform(raw.to_string())))
}

pub fn validate_agenda_id(id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid agenda item ID: {}. ID must be a positive integer",
            id
        )));
    }
    Ok(id)
}

pub fn validate_limit(limit: u64) -> Result<u64, ApiError> {
    const MAX_LIMIT: u64 = 200;
    const MIN_LIMIT: u64 = 1;

    if !(MIN_LIMIT..=MAX_LIMIT).contains(&limit) {
        return Err(ApiError::validation(format!(
            "Invalid limit: {}. Limit must be between {} and {}",
            limit, MIN_LIMIT, MAX_LIMIT
        )));
    }
    Ok(limit)
}
