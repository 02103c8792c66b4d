//! JWT 会话令牌服务
//!
//! 处理会话令牌的生成、验证和解析。令牌自包含身份、角色、套餐与过期时间，
//! 验证无需查库；签名密钥之外不可伪造。

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::models::{Role, SubscriptionTier};

/// 会话配置
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// 签名密钥 (应至少 32 字节)
    pub secret: String,
    /// 令牌过期时间 (分钟)
    pub expiration_minutes: i64,
    /// 令牌签发者
    pub issuer: String,
    /// 令牌受众
    pub audience: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let secret = match load_session_secret() {
            Ok(secret) => secret,
            Err(e) => {
                #[cfg(debug_assertions)]
                {
                    tracing::warn!("Session secret error: {}, using generated dev key", e);
                    generate_printable_secret()
                }
                #[cfg(not(debug_assertions))]
                {
                    panic!("FATAL: SESSION_SECRET configuration failed: {}", e);
                }
            }
        };

        Self {
            secret,
            expiration_minutes: std::env::var("SESSION_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1440), // 默认 24 小时
            issuer: std::env::var("SESSION_ISSUER").unwrap_or_else(|_| "sarv-server".to_string()),
            audience: std::env::var("SESSION_AUDIENCE")
                .unwrap_or_else(|_| "sarv-clients".to_string()),
        }
    }
}

/// 存储在令牌中的 Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 用户 ID (Subject)
    pub sub: String,
    /// 角色
    pub role: Role,
    /// 订阅套餐
    pub tier: SubscriptionTier,
    /// 过期时间戳
    pub exp: i64,
    /// 签发时间戳
    pub iat: i64,
    /// 签发者
    pub iss: String,
    /// 受众
    pub aud: String,
}

/// 会话错误 (仅签发路径可见；验证路径一律吞掉并返回 None)
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("令牌生成失败: {0}")]
    GenerationFailed(String),

    #[error("配置错误: {0}")]
    ConfigError(String),
}

/// 生成可打印的开发环境密钥
pub fn generate_printable_secret() -> String {
    use rand::Rng;
    let allowed_chars =
        "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()-_=+";
    let mut rng = rand::thread_rng();
    (0..64)
        .map(|_| {
            let idx = rng.gen_range(0..allowed_chars.len());
            allowed_chars.as_bytes()[idx] as char
        })
        .collect()
}

/// 从环境变量加载会话密钥
fn load_session_secret() -> Result<String, SessionError> {
    match std::env::var("SESSION_SECRET") {
        Ok(secret) => {
            if secret.len() < 32 {
                return Err(SessionError::ConfigError(
                    "SESSION_SECRET must be at least 32 characters long".to_string(),
                ));
            }
            Ok(secret)
        }
        Err(_) => {
            #[cfg(debug_assertions)]
            {
                tracing::warn!(
                    "SESSION_SECRET not set! Generating temporary key for development."
                );
                Ok(generate_printable_secret())
            }
            #[cfg(not(debug_assertions))]
            {
                Err(SessionError::ConfigError(
                    "SESSION_SECRET environment variable must be set in production!".to_string(),
                ))
            }
        }
    }
}

/// 当前会话上下文 (由 [`guard::load_session`](crate::auth::guard::load_session)
/// 注入请求扩展)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionPayload {
    pub user_id: i64,
    pub role: Role,
    pub tier: SubscriptionTier,
}

impl SessionPayload {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// JWT 会话服务
#[derive(Clone)]
pub struct SessionService {
    pub config: SessionConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl SessionService {
    /// 使用默认配置创建
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    /// 使用指定配置创建
    pub fn with_config(config: SessionConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// 为用户签发会话令牌
    pub fn issue(
        &self,
        user_id: i64,
        role: Role,
        tier: SubscriptionTier,
    ) -> Result<String, SessionError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: user_id.to_string(),
            role,
            tier,
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| SessionError::GenerationFailed(e.to_string()))
    }

    /// 验证令牌
    ///
    /// 缺失/格式错误/签名无效/已过期一律返回 None，绝不让错误越过此边界。
    pub fn verify(&self, token: &str) -> Option<SessionPayload> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let claims = match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(data) => data.claims,
            Err(e) => {
                match e.kind() {
                    ErrorKind::ExpiredSignature => {
                        tracing::debug!("Session token expired");
                    }
                    _ => {
                        tracing::debug!(error = %e, "Session token rejected");
                    }
                }
                return None;
            }
        };

        let user_id = claims.sub.parse::<i64>().ok()?;
        Some(SessionPayload {
            user_id,
            role: claims.role,
            tier: claims.tier,
        })
    }

    /// 会话有效期（分钟），用于 Cookie Max-Age
    pub fn expiration_minutes(&self) -> i64 {
        self.config.expiration_minutes
    }
}

impl Default for SessionService {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SessionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionService")
            .field("issuer", &self.config.issuer)
            .field("audience", &self.config.audience)
            .field("expiration_minutes", &self.config.expiration_minutes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> SessionService {
        SessionService::with_config(SessionConfig {
            secret: "a-test-secret-that-is-long-enough-123456".to_string(),
            expiration_minutes: 60,
            issuer: "sarv-server".to_string(),
            audience: "sarv-clients".to_string(),
        })
    }

    #[test]
    fn issue_and_verify_roundtrip() {
        let service = test_service();
        let token = service
            .issue(4211, Role::User, SubscriptionTier::Professional)
            .expect("Failed to issue token");

        let payload = service.verify(&token).expect("Token should verify");
        assert_eq!(payload.user_id, 4211);
        assert_eq!(payload.role, Role::User);
        assert_eq!(payload.tier, SubscriptionTier::Professional);
    }

    #[test]
    fn garbage_tokens_verify_to_none() {
        let service = test_service();
        assert!(service.verify("").is_none());
        assert!(service.verify("not-a-jwt").is_none());
        assert!(service.verify("aaaa.bbbb.cccc").is_none());
    }

    #[test]
    fn foreign_signature_is_rejected() {
        let service = test_service();
        let other = SessionService::with_config(SessionConfig {
            secret: "another-secret-that-is-also-long-enough".to_string(),
            expiration_minutes: 60,
            issuer: "sarv-server".to_string(),
            audience: "sarv-clients".to_string(),
        });
        let token = other
            .issue(1, Role::User, SubscriptionTier::Basic)
            .expect("Failed to issue token");
        assert!(service.verify(&token).is_none());
    }

    #[test]
    fn expired_token_verifies_to_none() {
        let service = SessionService::with_config(SessionConfig {
            secret: "a-test-secret-that-is-long-enough-123456".to_string(),
            expiration_minutes: -5,
            issuer: "sarv-server".to_string(),
            audience: "sarv-clients".to_string(),
        });
        let token = service
            .issue(1, Role::Admin, SubscriptionTier::Basic)
            .expect("Failed to issue token");
        assert!(service.verify(&token).is_none());
    }
}
