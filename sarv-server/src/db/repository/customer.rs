//! Customer Repository

use super::{RepoError, RepoResult};
use crate::db::models::{Customer, CustomerCreate};
use crate::utils::{now_millis, snowflake_id};
use sqlx::SqlitePool;

const CUSTOMER_SELECT: &str =
    "SELECT id, user_id, name, phone, loyalty_points, created_at FROM customer";

pub async fn find_all(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<Customer>> {
    let sql = format!("{CUSTOMER_SELECT} WHERE user_id = ? ORDER BY created_at DESC");
    let rows = sqlx::query_as::<_, Customer>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn create(pool: &SqlitePool, user_id: i64, data: CustomerCreate) -> RepoResult<Customer> {
    if data.name.trim().is_empty() {
        return Err(RepoError::Validation("name is required".into()));
    }
    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO customer (id, user_id, name, phone, loyalty_points, created_at) \
         VALUES (?, ?, ?, ?, 0, ?)",
    )
    .bind(id)
    .bind(user_id)
    .bind(data.name.trim())
    .bind(&data.phone)
    .bind(now_millis())
    .execute(pool)
    .await?;

    let sql = format!("{CUSTOMER_SELECT} WHERE id = ?");
    sqlx::query_as::<_, Customer>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create customer".into()))
}
