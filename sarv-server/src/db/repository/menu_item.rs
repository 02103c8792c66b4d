//! Menu Item Repository

use super::{RepoError, RepoResult};
use crate::db::models::{MenuItem, MenuItemCreate, MenuItemSummary, MenuItemUpdate};
use crate::utils::{now_millis, snowflake_id};
use sqlx::SqlitePool;
use sqlx::types::Json;

const MENU_ITEM_SELECT: &str = "SELECT id, user_id, name, price, cost, category, materials, created_at FROM menu_item";

pub async fn find_all(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<MenuItem>> {
    let sql = format!("{MENU_ITEM_SELECT} WHERE user_id = ? ORDER BY category, name");
    let rows = sqlx::query_as::<_, MenuItem>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_owned(pool: &SqlitePool, user_id: i64, id: i64) -> RepoResult<MenuItem> {
    let sql = format!("{MENU_ITEM_SELECT} WHERE id = ?");
    let item = sqlx::query_as::<_, MenuItem>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Menu item {id} not found")))?;
    if item.user_id != user_id {
        return Err(RepoError::Forbidden(
            "Menu item belongs to another account".into(),
        ));
    }
    Ok(item)
}

/// Resolve the requested ids scoped to the tenant. The caller decides what a
/// missing id means (sale creation reports it as NotFound by id).
pub async fn find_by_ids(
    pool: &SqlitePool,
    user_id: i64,
    ids: &[i64],
) -> RepoResult<Vec<MenuItem>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!("{MENU_ITEM_SELECT} WHERE user_id = ? AND id IN ({placeholders})");
    let mut query = sqlx::query_as::<_, MenuItem>(&sql).bind(user_id);
    for id in ids {
        query = query.bind(*id);
    }
    let rows = query.fetch_all(pool).await?;
    Ok(rows)
}

pub async fn create(pool: &SqlitePool, user_id: i64, data: MenuItemCreate) -> RepoResult<MenuItem> {
    if data.name.trim().is_empty() {
        return Err(RepoError::Validation("name and price are required".into()));
    }
    if data.price < 0.0 {
        return Err(RepoError::Validation("price must not be negative".into()));
    }
    if let Some(cost) = data.cost
        && cost < 0.0
    {
        return Err(RepoError::Validation("cost must not be negative".into()));
    }

    let id = snowflake_id();
    let category = data
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string);
    sqlx::query(
        "INSERT INTO menu_item (id, user_id, name, price, cost, category, materials, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(user_id)
    .bind(data.name.trim())
    .bind(data.price)
    .bind(data.cost)
    .bind(category)
    .bind(Json(data.materials.unwrap_or_default()))
    .bind(now_millis())
    .execute(pool)
    .await?;

    find_owned(pool, user_id, id).await
}

pub async fn update(
    pool: &SqlitePool,
    user_id: i64,
    id: i64,
    data: MenuItemUpdate,
) -> RepoResult<MenuItem> {
    find_owned(pool, user_id, id).await?;

    if let Some(price) = data.price
        && price < 0.0
    {
        return Err(RepoError::Validation("price must not be negative".into()));
    }
    if let Some(cost) = data.cost
        && cost < 0.0
    {
        return Err(RepoError::Validation("cost must not be negative".into()));
    }

    sqlx::query(
        "UPDATE menu_item SET name = COALESCE(?1, name), price = COALESCE(?2, price), \
         cost = COALESCE(?3, cost), category = COALESCE(?4, category), \
         materials = COALESCE(?5, materials) WHERE id = ?6",
    )
    .bind(&data.name)
    .bind(data.price)
    .bind(data.cost)
    .bind(&data.category)
    .bind(data.materials.map(Json))
    .bind(id)
    .execute(pool)
    .await?;

    find_owned(pool, user_id, id).await
}

pub async fn delete(pool: &SqlitePool, user_id: i64, id: i64) -> RepoResult<()> {
    find_owned(pool, user_id, id).await?;
    sqlx::query("DELETE FROM menu_item WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Reduced projection for the sale form and the public menu page
pub async fn list_summaries(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<MenuItemSummary>> {
    let rows = sqlx::query_as::<_, MenuItemSummary>(
        "SELECT id, name, price, category FROM menu_item WHERE user_id = ? ORDER BY category, name",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Distinct non-empty categories for the tenant's menu
pub async fn categories(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<String>> {
    let rows: Vec<(String,)> = sqlx::query_as(
        "SELECT DISTINCT category FROM menu_item \
         WHERE user_id = ? AND category IS NOT NULL ORDER BY category",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(|(c,)| c).collect())
}
