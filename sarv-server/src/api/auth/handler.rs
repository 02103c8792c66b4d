//! Authentication Handlers
//!
//! Handles registration, login, logout and session introspection.

use std::time::Duration;

use axum::{Json, extract::State};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use crate::auth::{SessionPayload, clear_session_cookie, session_cookie};
use crate::core::ServerState;
use crate::db::models::{Role, SubscriptionTier, User, UserCreate};
use crate::db::repository::user as user_repo;
use crate::utils::validation::{MAX_NAME_LEN, MAX_PASSWORD_LEN, MIN_PASSWORD_LEN};
use crate::utils::{AppError, AppResult, phone::normalize_phone, validation};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub phone: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub role: Role,
    pub subscription_tier: SubscriptionTier,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: i64,
    pub phone: String,
    pub name: String,
    pub role: Role,
    pub subscription_tier: SubscriptionTier,
    pub active: bool,
    pub has_online_menu: bool,
    pub created_at: i64,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            phone: user.phone,
            name: user.name,
            role: user.role,
            subscription_tier: user.subscription_tier,
            active: user.active,
            has_online_menu: user.has_online_menu,
            created_at: user.created_at,
        }
    }
}

/// POST /api/auth/register - 注册新租户
///
/// 手机号规范化失败即校验失败；新账户 `active=false`，等待管理员激活。
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<UserCreate>,
) -> AppResult<Json<UserInfo>> {
    validation::validate_required_text(&req.name, "name", MAX_NAME_LEN)?;
    if req.password.len() < MIN_PASSWORD_LEN || req.password.len() > MAX_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password must be between {MIN_PASSWORD_LEN} and {MAX_PASSWORD_LEN} characters"
        )));
    }
    let phone = normalize_phone(&req.phone)
        .ok_or_else(|| AppError::validation("phone number is not a valid mobile number"))?;

    let user = user_repo::register(
        state.pool(),
        req.name.trim(),
        &phone,
        &req.password,
        req.subscription_tier,
    )
    .await?;

    tracing::info!(user_id = user.id, "New account registered (inactive)");
    Ok(Json(user.into()))
}

/// POST /api/auth/login - 登录
///
/// 统一的「手机号或密码错误」消息防止账号枚举；未激活的非管理员账户
/// 在签发令牌之前就被拒绝。成功时把令牌写入 HttpOnly 会话 Cookie。
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> AppResult<(CookieJar, Json<LoginResponse>)> {
    let lookup = normalize_phone(&req.phone).unwrap_or_else(|| req.phone.clone());
    let user = user_repo::find_by_phone(state.pool(), &lookup).await?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let user = match user {
        Some(u) => {
            let password_valid = u
                .verify_password(&req.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;
            if !password_valid {
                tracing::warn!(phone = %lookup, "Login failed - invalid credentials");
                return Err(AppError::invalid_credentials());
            }
            u
        }
        None => {
            tracing::warn!(phone = %lookup, "Login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    // Activation gate comes after credential verification and before any
    // token is issued; it is a distinct failure from plan or role denials.
    if !user.is_active() {
        return Err(AppError::forbidden(
            "Account not active. Please wait for admin approval.",
        ));
    }

    let token = state
        .session_service
        .issue(user.id, user.role, user.subscription_tier)
        .map_err(|e| AppError::internal(format!("Failed to issue session: {e}")))?;
    let jar = jar.add(session_cookie(
        token,
        state.session_service.expiration_minutes(),
    ));

    tracing::info!(user_id = user.id, role = ?user.role, "User logged in");
    Ok((
        jar,
        Json(LoginResponse {
            success: true,
            role: user.role,
            subscription_tier: user.subscription_tier,
        }),
    ))
}

/// POST /api/auth/logout - 登出（下发已过期的同名 Cookie）
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<serde_json::Value>) {
    (
        jar.add(clear_session_cookie()),
        Json(serde_json::json!({ "success": true })),
    )
}

/// GET /api/auth/me - 当前会话的账户信息
pub async fn me(
    State(state): State<ServerState>,
    session: SessionPayload,
) -> AppResult<Json<UserInfo>> {
    let user = user_repo::find_by_id(state.pool(), session.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Account not found"))?;
    Ok(Json(user.into()))
}
