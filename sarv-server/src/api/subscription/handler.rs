//! Subscription Handlers
//!
//! `check` 直接走套餐门禁的判定函数并把带标签的结果原样回给客户端，
//! 是唯一一个「被拒绝也返回 200 判定」的入口。

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::auth::guard::MaybeSession;
use crate::auth::{PlanDecision, SessionPayload, check_plan};
use crate::core::ServerState;
use crate::db::models::SubscriptionTier;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    pub plan: SubscriptionTier,
}

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub authorized: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_tier: Option<SubscriptionTier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
}

/// POST /api/subscription/check - 当前会话是否满足某套餐
pub async fn check(
    State(_state): State<ServerState>,
    MaybeSession(session): MaybeSession,
    Json(req): Json<CheckRequest>,
) -> Json<CheckResponse> {
    match check_plan(session.as_ref(), &[req.plan]) {
        PlanDecision::Authorized { session } => Json(CheckResponse {
            authorized: true,
            subscription_tier: Some(session.tier),
            reason: None,
        }),
        PlanDecision::Denied { reason } => Json(CheckResponse {
            authorized: false,
            subscription_tier: None,
            reason: Some(reason),
        }),
    }
}

#[derive(Debug, Deserialize)]
pub struct UpgradeRequest {
    pub subscription_tier: SubscriptionTier,
}

#[derive(Debug, Serialize)]
pub struct UpgradeResponse {
    pub message: &'static str,
    pub requested_tier: SubscriptionTier,
}

/// POST /api/subscription/upgrade - 申请升级
///
/// 只受理升级；降级由管理员处理。实际套餐变更经管理员核准后在控制台完成。
pub async fn upgrade(
    State(_state): State<ServerState>,
    session: SessionPayload,
    Json(req): Json<UpgradeRequest>,
) -> AppResult<Json<UpgradeResponse>> {
    if session.tier == SubscriptionTier::Professional
        && req.subscription_tier == SubscriptionTier::Basic
    {
        return Err(AppError::validation(
            "Downgrades are handled by the administrator",
        ));
    }

    tracing::info!(
        user_id = session.user_id,
        requested = req.subscription_tier.as_str(),
        "Plan upgrade requested"
    );
    Ok(Json(UpgradeResponse {
        message: "Upgrade request recorded. The administrator will review and approve it.",
        requested_tier: req.subscription_tier,
    }))
}
