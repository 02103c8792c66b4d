//! Product Repository — 库存台账
//!
//! 核心不变量：`product.stock` 永远等于该产品全部 `inventory_log.change` 之和。
//! 因此每一条修改库存的路径都把 (库存写入, 台账追加) 放进同一个事务：
//! 两者要么同时生效要么同时失败，部分生效即为正确性缺陷。

use super::{RepoError, RepoResult};
use crate::db::models::{
    InventoryLog, Product, ProductCreate, ProductUpdate, REASON_INITIAL_STOCK,
    REASON_MANUAL_CORRECTION,
};
use crate::utils::{now_millis, snowflake_id};
use sqlx::{Sqlite, SqlitePool, Transaction};

const PRODUCT_SELECT: &str = "SELECT id, user_id, name, price, stock, stock_unit, category, purchase_date, expiration_date, created_at FROM product";

pub async fn find_all(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<Product>> {
    let sql = format!("{PRODUCT_SELECT} WHERE user_id = ? ORDER BY name ASC");
    let rows = sqlx::query_as::<_, Product>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Fetch a product and enforce tenant ownership.
///
/// Absent rows are NotFound; rows owned by another tenant are Forbidden
/// (uniform ownership policy, never a silent filter).
pub async fn find_owned(pool: &SqlitePool, user_id: i64, id: i64) -> RepoResult<Product> {
    let sql = format!("{PRODUCT_SELECT} WHERE id = ?");
    let product = sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))?;
    if product.user_id != user_id {
        return Err(RepoError::Forbidden(
            "Product belongs to another account".into(),
        ));
    }
    Ok(product)
}

/// Create a product. Non-zero opening stock is logged as "initial stock" in
/// the same transaction as the insert.
pub async fn create(pool: &SqlitePool, user_id: i64, data: ProductCreate) -> RepoResult<Product> {
    if data.name.trim().is_empty() || data.category.trim().is_empty() {
        return Err(RepoError::Validation(
            "name, price and category are required".into(),
        ));
    }
    if data.price < 0.0 {
        return Err(RepoError::Validation("price must not be negative".into()));
    }

    let id = snowflake_id();
    let now = now_millis();
    let stock = data.stock.unwrap_or(0);

    let mut tx = pool.begin().await?;
    sqlx::query(
        "INSERT INTO product (id, user_id, name, price, stock, stock_unit, category, purchase_date, expiration_date, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(user_id)
    .bind(data.name.trim())
    .bind(data.price)
    .bind(stock)
    .bind(&data.stock_unit)
    .bind(data.category.trim())
    .bind(&data.purchase_date)
    .bind(&data.expiration_date)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    if stock != 0 {
        append_log(&mut tx, id, stock, REASON_INITIAL_STOCK, now).await?;
    }
    tx.commit().await?;

    find_owned(pool, user_id, id).await
}

/// Adjust stock by a signed delta and append the matching ledger entry.
///
/// No floor at zero: a negative resulting stock is recorded as-is (policy
/// decision, see DESIGN.md).
pub async fn adjust_stock(
    pool: &SqlitePool,
    user_id: i64,
    product_id: i64,
    change: i64,
    reason: &str,
) -> RepoResult<Product> {
    find_owned(pool, user_id, product_id).await?;

    let mut tx = pool.begin().await?;
    sqlx::query("UPDATE product SET stock = stock + ? WHERE id = ?")
        .bind(change)
        .bind(product_id)
        .execute(&mut *tx)
        .await?;
    append_log(&mut tx, product_id, change, reason, now_millis()).await?;
    tx.commit().await?;

    find_owned(pool, user_id, product_id).await
}

/// Patch product fields. A present `stock` that differs from the stored
/// value becomes a "manual correction" ledger entry for the delta; all other
/// fields replace without logging.
pub async fn update(
    pool: &SqlitePool,
    user_id: i64,
    id: i64,
    data: ProductUpdate,
) -> RepoResult<Product> {
    let existing = find_owned(pool, user_id, id).await?;

    if let Some(price) = data.price
        && price < 0.0
    {
        return Err(RepoError::Validation("price must not be negative".into()));
    }

    let mut tx = pool.begin().await?;
    sqlx::query(
        "UPDATE product SET name = COALESCE(?1, name), price = COALESCE(?2, price), \
         stock_unit = COALESCE(?3, stock_unit), category = COALESCE(?4, category), \
         expiration_date = COALESCE(?5, expiration_date) WHERE id = ?6",
    )
    .bind(&data.name)
    .bind(data.price)
    .bind(&data.stock_unit)
    .bind(&data.category)
    .bind(&data.expiration_date)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    // The counter moves by the delta rather than being overwritten, so it
    // stays equal to the ledger sum even when writers interleave.
    if let Some(new_stock) = data.stock
        && new_stock != existing.stock
    {
        let change = new_stock - existing.stock;
        sqlx::query("UPDATE product SET stock = stock + ? WHERE id = ?")
            .bind(change)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        append_log(&mut tx, id, change, REASON_MANUAL_CORRECTION, now_millis()).await?;
    }
    tx.commit().await?;

    find_owned(pool, user_id, id).await
}

/// Delete a product and its ledger. Refused while any sale line still
/// references the product — sold materials stay on the books.
pub async fn delete(pool: &SqlitePool, user_id: i64, id: i64) -> RepoResult<()> {
    find_owned(pool, user_id, id).await?;

    let (sale_refs,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM sale_item WHERE product_id = ?")
            .bind(id)
            .fetch_one(pool)
            .await?;
    if sale_refs > 0 {
        return Err(RepoError::Conflict(
            "Product has recorded sales and cannot be deleted".into(),
        ));
    }

    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM inventory_log WHERE product_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM product WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(())
}

/// Ledger entries for one owned product, newest first.
pub async fn ledger(
    pool: &SqlitePool,
    user_id: i64,
    product_id: i64,
) -> RepoResult<Vec<InventoryLog>> {
    find_owned(pool, user_id, product_id).await?;
    let rows = sqlx::query_as::<_, InventoryLog>(
        "SELECT id, product_id, change, reason, created_at FROM inventory_log \
         WHERE product_id = ? ORDER BY created_at DESC, id DESC",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Sum of all ledger entries for a product (reconciliation checks)
pub async fn ledger_sum(pool: &SqlitePool, product_id: i64) -> RepoResult<i64> {
    let (sum,): (i64,) = sqlx::query_as(
        "SELECT COALESCE(SUM(change), 0) FROM inventory_log WHERE product_id = ?",
    )
    .bind(product_id)
    .fetch_one(pool)
    .await?;
    Ok(sum)
}

/// All ledger entries across a tenant's products joined with product data,
/// newest first (accounting materials report).
pub async fn ledger_for_user(
    pool: &SqlitePool,
    user_id: i64,
) -> RepoResult<Vec<crate::db::models::product::InventoryLogDetail>> {
    let rows = sqlx::query_as(
        "SELECT l.id, l.product_id, l.change, l.reason, l.created_at, \
                p.name AS product_name, p.price AS product_price, p.stock_unit \
         FROM inventory_log l JOIN product p ON l.product_id = p.id \
         WHERE p.user_id = ? ORDER BY l.created_at DESC, l.id DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

async fn append_log(
    tx: &mut Transaction<'_, Sqlite>,
    product_id: i64,
    change: i64,
    reason: &str,
    now: i64,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO inventory_log (id, product_id, change, reason, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(snowflake_id())
    .bind(product_id)
    .bind(change)
    .bind(reason)
    .bind(now)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
