//! Cafe Profile Handlers

use axum::{Json, extract::State};

use crate::auth::SessionPayload;
use crate::core::ServerState;
use crate::db::models::{UserProfile, UserProfileUpdate};
use crate::db::repository::user as user_repo;
use crate::utils::validation::{MAX_NAME_LEN, validate_http_url, validate_required_text};
use crate::utils::{AppError, AppResult};

/// GET /api/settings/profile - 店铺资料
pub async fn get_profile(
    State(state): State<ServerState>,
    session: SessionPayload,
) -> AppResult<Json<UserProfile>> {
    let profile = user_repo::profile(state.pool(), session.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Account not found"))?;
    Ok(Json(profile))
}

/// PUT /api/settings/profile - 更新店铺资料
///
/// 图片链接要求 http(s)；Instagram 链接还要求指向 instagram.com。
/// 空串视为清除。
pub async fn update_profile(
    State(state): State<ServerState>,
    session: SessionPayload,
    Json(req): Json<UserProfileUpdate>,
) -> AppResult<Json<UserProfile>> {
    validate_required_text(&req.name, "name", MAX_NAME_LEN)?;

    let cafe_image_url = normalize_optional_url(req.cafe_image_url, "cafe_image_url", None)?;
    let instagram_url = normalize_optional_url(
        req.instagram_url,
        "instagram_url",
        Some("instagram.com"),
    )?;

    let profile = user_repo::update_profile(
        state.pool(),
        session.user_id,
        req.name.trim(),
        cafe_image_url.as_deref(),
        instagram_url.as_deref(),
    )
    .await?;
    Ok(Json(profile))
}

fn normalize_optional_url(
    value: Option<String>,
    field: &str,
    require_host: Option<&str>,
) -> Result<Option<String>, AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => {
            validate_http_url(&v, field, require_host)?;
            Ok(Some(v.trim().to_string()))
        }
        _ => Ok(None),
    }
}
