//! User Model
//!
//! 租户账户：手机号登录、角色、订阅套餐、激活状态。

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Account role. Admin is a disjoint console mode, not a superset of a
/// tenant's capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

/// Subscription tier. Gating is set-membership over these values, never an
/// ordering between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum SubscriptionTier {
    Basic,
    Professional,
}

impl SubscriptionTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionTier::Basic => "BASIC",
            SubscriptionTier::Professional => "PROFESSIONAL",
        }
    }
}

/// User row
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub phone: String,
    #[serde(skip_serializing)]
    pub hash_pass: String,
    pub name: String,
    pub role: Role,
    pub subscription_tier: SubscriptionTier,
    pub active: bool,
    pub has_online_menu: bool,
    pub cafe_image_url: Option<String>,
    pub instagram_url: Option<String>,
    pub created_at: i64,
}

impl User {
    /// 管理员账户无论存储标志如何都视为激活
    pub fn is_active(&self) -> bool {
        self.active || self.role == Role::Admin
    }

    /// Verify password using argon2
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHash, PasswordVerifier},
        };

        let parsed_hash = PasswordHash::new(&self.hash_pass)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash password using argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }
}

/// Registration payload
#[derive(Debug, Clone, Deserialize)]
pub struct UserCreate {
    pub name: String,
    pub phone: String,
    pub password: String,
    pub subscription_tier: SubscriptionTier,
}

/// Cafe profile projection exposed on the settings endpoint
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserProfile {
    pub name: String,
    pub phone: String,
    pub cafe_image_url: Option<String>,
    pub instagram_url: Option<String>,
}

/// Profile update payload
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfileUpdate {
    pub name: String,
    pub cafe_image_url: Option<String>,
    pub instagram_url: Option<String>,
}
