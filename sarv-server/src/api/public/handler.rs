//! Public Menu Handlers
//!
//! slug 形如 `{cafe-slug}--{user_id}`，从最后一个 `--` 之后取租户 id。
//! 只有管理员开通过在线菜单的账户才会被呈现；未开通与不存在同样返回 404，
//! 不向外暴露账户是否存在。

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use crate::core::ServerState;
use crate::db::models::MenuItemSummary;
use crate::db::repository::{menu_item as menu_repo, user as user_repo};
use crate::utils::slug::parse_share_slug;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Serialize)]
pub struct PublicMenuResponse {
    pub cafe_name: String,
    pub cafe_image_url: Option<String>,
    pub instagram_url: Option<String>,
    pub items: Vec<MenuItemSummary>,
}

/// GET /api/public/menu/{slug} - 只读在线菜单
pub async fn shared_menu(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
) -> AppResult<Json<PublicMenuResponse>> {
    let user_id =
        parse_share_slug(&slug).ok_or_else(|| AppError::not_found("Menu not found"))?;

    let user = user_repo::find_by_id(state.pool(), user_id)
        .await?
        .filter(|u| u.has_online_menu)
        .ok_or_else(|| AppError::not_found("Menu not found"))?;

    let items = menu_repo::list_summaries(state.pool(), user.id).await?;

    Ok(Json(PublicMenuResponse {
        cafe_name: user.name,
        cafe_image_url: user.cafe_image_url,
        instagram_url: user.instagram_url,
        items,
    }))
}
