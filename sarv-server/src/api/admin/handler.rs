//! Admin Console Handlers
//!
//! 账户激活是 {inactive → active} 的显式管理动作，没有任何自动转移。

use axum::{Json, extract::State};
use serde::Deserialize;

use crate::api::auth::UserInfo;
use crate::core::ServerState;
use crate::db::models::SubscriptionTier;
use crate::db::repository::user as user_repo;
use crate::utils::AppResult;

/// GET /api/admin/users - 全部账户（新到旧）
pub async fn list_users(State(state): State<ServerState>) -> AppResult<Json<Vec<UserInfo>>> {
    let users = user_repo::list_all(state.pool()).await?;
    Ok(Json(users.into_iter().map(UserInfo::from).collect()))
}

#[derive(Debug, Deserialize)]
pub struct ActivateRequest {
    pub user_id: i64,
    pub active: bool,
}

/// POST /api/admin/users/activate - 激活/停用账户
pub async fn activate_user(
    State(state): State<ServerState>,
    Json(req): Json<ActivateRequest>,
) -> AppResult<Json<UserInfo>> {
    let user = user_repo::set_active(state.pool(), req.user_id, req.active).await?;
    tracing::info!(user_id = req.user_id, active = req.active, "Account activation changed");
    Ok(Json(user.into()))
}

#[derive(Debug, Deserialize)]
pub struct UpdatePlanRequest {
    pub user_id: i64,
    pub subscription_tier: SubscriptionTier,
}

/// POST /api/admin/users/plan - 调整订阅套餐
pub async fn update_plan(
    State(state): State<ServerState>,
    Json(req): Json<UpdatePlanRequest>,
) -> AppResult<Json<UserInfo>> {
    let user = user_repo::set_plan(state.pool(), req.user_id, req.subscription_tier).await?;
    tracing::info!(
        user_id = req.user_id,
        tier = req.subscription_tier.as_str(),
        "Subscription tier changed"
    );
    Ok(Json(user.into()))
}

#[derive(Debug, Deserialize)]
pub struct UpdateOnlineMenuRequest {
    pub user_id: i64,
    pub has_online_menu: bool,
}

/// POST /api/admin/users/online-menu - 开关在线菜单
pub async fn update_online_menu(
    State(state): State<ServerState>,
    Json(req): Json<UpdateOnlineMenuRequest>,
) -> AppResult<Json<UserInfo>> {
    let user =
        user_repo::set_online_menu(state.pool(), req.user_id, req.has_online_menu).await?;
    Ok(Json(user.into()))
}
