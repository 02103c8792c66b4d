//! 认证授权模块
//!
//! 提供会话签发/校验、Cookie 约定和路由守卫：
//! - [`SessionService`] - JWT 会话令牌服务
//! - [`SessionPayload`] - 当前会话上下文
//! - [`guard`] - 会话加载中间件与套餐/角色守卫
//! - [`cookie`] - HttpOnly 会话 Cookie

pub mod cookie;
pub mod guard;
pub mod session;

pub use cookie::{SESSION_COOKIE, clear_session_cookie, session_cookie};
pub use guard::{
    ANY_TIER, PROFESSIONAL_ONLY, PlanDecision, check_plan, load_session, require_admin,
    require_plan, require_user,
};
pub use session::{SessionConfig, SessionError, SessionPayload, SessionService};
