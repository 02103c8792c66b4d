//! 授权守卫
//!
//! 所有 API 路由在触达数据层之前都要经过这里：
//! - [`load_session`] - 解析 Cookie 中的会话令牌并注入请求扩展（从不拒绝）
//! - [`check_plan`] - 套餐门禁的判定函数，返回带标签的结果而非抛错
//! - [`require_plan`] / [`require_admin`] / [`require_user`] - 路由层中间件，
//!   判定失败直接短路返回，处理函数与数据库完全不被触及
//!
//! 管理员是独立的控制台模式而非租户能力的超集：租户路由对管理员会话同样拒绝。

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::auth::cookie::SESSION_COOKIE;
use crate::auth::session::SessionPayload;
use crate::core::ServerState;
use crate::db::models::SubscriptionTier;
use crate::utils::AppError;

/// 无会话的拒绝原因
pub const REASON_NO_SESSION: &str = "no active session";
/// 套餐不满足的拒绝原因
pub const REASON_PLAN_INSUFFICIENT: &str = "plan insufficient";

/// 两档套餐全开放的路由使用的白名单
pub const ANY_TIER: &[SubscriptionTier] =
    &[SubscriptionTier::Basic, SubscriptionTier::Professional];
/// 仅专业版路由使用的白名单
pub const PROFESSIONAL_ONLY: &[SubscriptionTier] = &[SubscriptionTier::Professional];

/// 套餐门禁判定结果
///
/// 带标签的结果类型，调用方必须显式处理否定分支；判定本身绝不抛错。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanDecision {
    Authorized { session: SessionPayload },
    Denied { reason: &'static str },
}

impl PlanDecision {
    pub fn is_authorized(&self) -> bool {
        matches!(self, PlanDecision::Authorized { .. })
    }
}

/// 套餐门禁判定：集合成员关系，套餐之间没有高低序
pub fn check_plan(session: Option<&SessionPayload>, allowed: &[SubscriptionTier]) -> PlanDecision {
    let Some(session) = session else {
        return PlanDecision::Denied {
            reason: REASON_NO_SESSION,
        };
    };
    if !allowed.contains(&session.tier) {
        return PlanDecision::Denied {
            reason: REASON_PLAN_INSUFFICIENT,
        };
    }
    PlanDecision::Authorized { session: *session }
}

/// 会话加载中间件
///
/// 从会话 Cookie 提取并验证令牌，验证成功后将 [`SessionPayload`]
/// 注入请求扩展。本中间件自身从不拒绝请求——拒绝由各路由的守卫决定。
pub async fn load_session(
    State(state): State<ServerState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    if let Some(cookie) = jar.get(SESSION_COOKIE)
        && let Some(session) = state.session_service.verify(cookie.value())
    {
        req.extensions_mut().insert(session);
    }
    next.run(req).await
}

/// 套餐守卫中间件 - 要求会话套餐在白名单内
///
/// # 用法
///
/// ```ignore
/// Router::new()
///     .route("/api/inventory", get(handler::list))
///     .route_layer(axum::middleware::from_fn(require_plan(ANY_TIER)));
/// ```
///
/// # 错误
///
/// | 情况 | 响应 |
/// |------|------|
/// | 无会话 | 401 Unauthenticated |
/// | 套餐不在白名单 | 403 "plan insufficient" |
/// | 管理员会话 | 403 (租户路由不对控制台开放) |
pub fn require_plan(
    allowed: &'static [SubscriptionTier],
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let session = req.extensions().get::<SessionPayload>();
            if session.is_some_and(|s| s.is_admin()) {
                return Err(AppError::forbidden(
                    "admin accounts cannot use tenant routes",
                ));
            }
            match check_plan(session, allowed) {
                PlanDecision::Authorized { .. } => Ok(next.run(req).await),
                PlanDecision::Denied { reason } if reason == REASON_NO_SESSION => {
                    Err(AppError::Unauthenticated)
                }
                PlanDecision::Denied { reason } => {
                    tracing::warn!(reason, "Plan gate denied request");
                    Err(AppError::forbidden(reason))
                }
            }
        })
    }
}

/// 管理员守卫中间件 - 仅管理员会话可通过
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let session = req
        .extensions()
        .get::<SessionPayload>()
        .ok_or(AppError::Unauthenticated)?;
    if !session.is_admin() {
        tracing::warn!(user_id = session.user_id, "Admin route denied");
        return Err(AppError::forbidden("admin role required"));
    }
    Ok(next.run(req).await)
}

/// 处理函数参数形式的会话提取：`async fn handler(session: SessionPayload)`
///
/// 守卫之后仍缺会话（公共路由误用等）时返回 401 而非 500。
impl<S> axum::extract::FromRequestParts<S> for SessionPayload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionPayload>()
            .copied()
            .ok_or(AppError::Unauthenticated)
    }
}

/// 可缺省的会话提取：公共判定端点用它拿到「可能存在」的会话
#[derive(Debug, Clone, Copy)]
pub struct MaybeSession(pub Option<SessionPayload>);

impl<S> axum::extract::FromRequestParts<S> for MaybeSession
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeSession(
            parts.extensions.get::<SessionPayload>().copied(),
        ))
    }
}

/// 租户守卫中间件 - 要求普通用户会话，管理员被拒绝
pub async fn require_user(req: Request, next: Next) -> Result<Response, AppError> {
    let session = req
        .extensions()
        .get::<SessionPayload>()
        .ok_or(AppError::Unauthenticated)?;
    if session.is_admin() {
        return Err(AppError::forbidden(
            "admin accounts cannot use tenant routes",
        ));
    }
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::Role;

    fn session(tier: SubscriptionTier) -> SessionPayload {
        SessionPayload {
            user_id: 7,
            role: Role::User,
            tier,
        }
    }

    #[test]
    fn missing_session_is_denied_with_reason() {
        let decision = check_plan(None, PROFESSIONAL_ONLY);
        assert_eq!(
            decision,
            PlanDecision::Denied {
                reason: REASON_NO_SESSION
            }
        );
    }

    #[test]
    fn basic_tier_is_denied_on_professional_routes() {
        let s = session(SubscriptionTier::Basic);
        let decision = check_plan(Some(&s), PROFESSIONAL_ONLY);
        assert_eq!(
            decision,
            PlanDecision::Denied {
                reason: REASON_PLAN_INSUFFICIENT
            }
        );
    }

    #[test]
    fn membership_is_a_set_check_not_an_ordering() {
        // PROFESSIONAL is not "greater than" BASIC: a BASIC-only list
        // denies a PROFESSIONAL session just the same.
        let s = session(SubscriptionTier::Professional);
        let decision = check_plan(Some(&s), &[SubscriptionTier::Basic]);
        assert!(!decision.is_authorized());
    }

    #[test]
    fn allowed_tier_passes_with_session() {
        let s = session(SubscriptionTier::Professional);
        match check_plan(Some(&s), ANY_TIER) {
            PlanDecision::Authorized { session } => assert_eq!(session.user_id, 7),
            PlanDecision::Denied { .. } => panic!("expected authorization"),
        }
    }
}
