//! Menu API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use crate::auth::SessionPayload;
use crate::core::ServerState;
use crate::db::models::{MenuItem, MenuItemCreate, MenuItemSummary, MenuItemUpdate};
use crate::db::repository::{menu_item as menu_repo, user as user_repo};
use crate::utils::slug::build_share_slug;
use crate::utils::{AppError, AppResult};

/// GET /api/menu - 当前租户的全部菜单项
pub async fn list(
    State(state): State<ServerState>,
    session: SessionPayload,
) -> AppResult<Json<Vec<MenuItem>>> {
    let items = menu_repo::find_all(state.pool(), session.user_id).await?;
    Ok(Json(items))
}

/// POST /api/menu - 新建菜单项
pub async fn create(
    State(state): State<ServerState>,
    session: SessionPayload,
    Json(payload): Json<MenuItemCreate>,
) -> AppResult<Json<MenuItem>> {
    let item = menu_repo::create(state.pool(), session.user_id, payload).await?;
    tracing::info!(menu_item_id = item.id, "Menu item created");
    Ok(Json(item))
}

/// PUT /api/menu/{id} - 更新菜单项
pub async fn update(
    State(state): State<ServerState>,
    session: SessionPayload,
    Path(id): Path<i64>,
    Json(payload): Json<MenuItemUpdate>,
) -> AppResult<Json<MenuItem>> {
    let item = menu_repo::update(state.pool(), session.user_id, id, payload).await?;
    Ok(Json(item))
}

/// DELETE /api/menu/{id} - 删除菜单项
pub async fn delete(
    State(state): State<ServerState>,
    session: SessionPayload,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    menu_repo::delete(state.pool(), session.user_id, id).await?;
    Ok(Json(true))
}

/// GET /api/menu/for-sales - 销售表单用的精简投影
pub async fn list_for_sales(
    State(state): State<ServerState>,
    session: SessionPayload,
) -> AppResult<Json<Vec<MenuItemSummary>>> {
    let items = menu_repo::list_summaries(state.pool(), session.user_id).await?;
    Ok(Json(items))
}

/// GET /api/menu/categories - 去重后的分类列表
pub async fn categories(
    State(state): State<ServerState>,
    session: SessionPayload,
) -> AppResult<Json<Vec<String>>> {
    let categories = menu_repo::categories(state.pool(), session.user_id).await?;
    Ok(Json(categories))
}

#[derive(Debug, Serialize)]
pub struct ShareResponse {
    pub share_slug: String,
    pub cafe_name: String,
    pub cafe_image_url: Option<String>,
    pub instagram_url: Option<String>,
}

/// GET /api/menu/share - 在线菜单分享链接
///
/// 仅对管理员开通过 `has_online_menu` 的账户可用。
pub async fn share(
    State(state): State<ServerState>,
    session: SessionPayload,
) -> AppResult<Json<ShareResponse>> {
    let user = user_repo::find_by_id(state.pool(), session.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Account not found"))?;

    if !user.has_online_menu {
        return Err(AppError::forbidden(
            "Online menu is not enabled for this account",
        ));
    }

    Ok(Json(ShareResponse {
        share_slug: build_share_slug(&user.name, user.id),
        cafe_name: user.name,
        cafe_image_url: user.cafe_image_url,
        instagram_url: user.instagram_url,
    }))
}
