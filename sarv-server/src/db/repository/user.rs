//! User Repository

use super::{RepoError, RepoResult};
use crate::db::models::{Role, SubscriptionTier, User, UserProfile};
use crate::utils::{now_millis, snowflake_id};
use sqlx::SqlitePool;

const USER_SELECT: &str = "SELECT id, phone, hash_pass, name, role, subscription_tier, active, has_online_menu, cafe_image_url, instagram_url, created_at FROM user";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_phone(pool: &SqlitePool, phone: &str) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE phone = ? LIMIT 1");
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(phone)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Register a new tenant account. The phone is expected to be normalized
/// already; non-admin accounts start inactive and wait for admin activation.
pub async fn register(
    pool: &SqlitePool,
    name: &str,
    phone: &str,
    password: &str,
    tier: SubscriptionTier,
) -> RepoResult<User> {
    if find_by_phone(pool, phone).await?.is_some() {
        return Err(RepoError::Conflict("Phone already registered".into()));
    }

    let hash = User::hash_password(password)
        .map_err(|e| RepoError::Database(format!("Password hashing failed: {e}")))?;
    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO user (id, phone, hash_pass, name, role, subscription_tier, active, has_online_menu, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, 0, 0, ?)",
    )
    .bind(id)
    .bind(phone)
    .bind(&hash)
    .bind(name)
    .bind(Role::User)
    .bind(tier)
    .bind(now_millis())
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

pub async fn list_all(pool: &SqlitePool) -> RepoResult<Vec<User>> {
    let sql = format!("{USER_SELECT} ORDER BY created_at DESC");
    let rows = sqlx::query_as::<_, User>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

/// Flip the activation flag (admin console). inactive→active is the only
/// transition the UI offers, but deactivation is kept for admin use.
pub async fn set_active(pool: &SqlitePool, user_id: i64, active: bool) -> RepoResult<User> {
    let rows = sqlx::query("UPDATE user SET active = ? WHERE id = ?")
        .bind(active)
        .bind(user_id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {user_id} not found")));
    }
    find_by_id(pool, user_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("User {user_id} not found")))
}

pub async fn set_plan(
    pool: &SqlitePool,
    user_id: i64,
    tier: SubscriptionTier,
) -> RepoResult<User> {
    let rows = sqlx::query("UPDATE user SET subscription_tier = ? WHERE id = ?")
        .bind(tier)
        .bind(user_id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {user_id} not found")));
    }
    find_by_id(pool, user_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("User {user_id} not found")))
}

pub async fn set_online_menu(pool: &SqlitePool, user_id: i64, enabled: bool) -> RepoResult<User> {
    let rows = sqlx::query("UPDATE user SET has_online_menu = ? WHERE id = ?")
        .bind(enabled)
        .bind(user_id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {user_id} not found")));
    }
    find_by_id(pool, user_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("User {user_id} not found")))
}

pub async fn profile(pool: &SqlitePool, user_id: i64) -> RepoResult<Option<UserProfile>> {
    let row = sqlx::query_as::<_, UserProfile>(
        "SELECT name, phone, cafe_image_url, instagram_url FROM user WHERE id = ?",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn update_profile(
    pool: &SqlitePool,
    user_id: i64,
    name: &str,
    cafe_image_url: Option<&str>,
    instagram_url: Option<&str>,
) -> RepoResult<UserProfile> {
    let rows = sqlx::query(
        "UPDATE user SET name = ?, cafe_image_url = ?, instagram_url = ? WHERE id = ?",
    )
    .bind(name)
    .bind(cafe_image_url)
    .bind(instagram_url)
    .bind(user_id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {user_id} not found")));
    }
    profile(pool, user_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("User {user_id} not found")))
}
