//! Sale Repository — 销售记录
//!
//! 行项价格在建单时刻快照自菜单当前价格，此后不再重算；
//! 表头 `total` 恒等于各行 `qty * price` 之和。表头与行项在同一事务写入。

use super::{RepoError, RepoResult, menu_item};
use crate::db::models::{PaymentMethod, Sale, SaleItemDetail, SaleLineInput, SaleWithItems};
use crate::utils::{now_millis, snowflake_id};
use sqlx::SqlitePool;

const SALE_SELECT: &str =
    "SELECT id, user_id, total, tax, phone, payment_method, created_at FROM sale";

const SALE_ITEM_DETAIL_SELECT: &str = "SELECT si.id, si.sale_id, si.menu_item_id, si.product_id, \
     si.qty, si.price, COALESCE(m.name, p.name) AS name, m.cost AS menu_cost, \
     p.price AS product_price \
     FROM sale_item si \
     LEFT JOIN menu_item m ON si.menu_item_id = m.id \
     LEFT JOIN product p ON si.product_id = p.id";

/// Record a sale: snapshot prices, derive the total, insert header and lines
/// as one unit. The phone is expected to be pre-normalized (or dropped) by
/// the caller.
pub async fn create(
    pool: &SqlitePool,
    user_id: i64,
    lines: &[SaleLineInput],
    phone: Option<String>,
    payment_method: Option<PaymentMethod>,
) -> RepoResult<SaleWithItems> {
    if lines.is_empty() {
        return Err(RepoError::Validation("sale has no items".into()));
    }
    if lines.iter().any(|l| l.qty <= 0) {
        return Err(RepoError::Validation(
            "item quantity must be positive".into(),
        ));
    }

    let ids: Vec<i64> = lines.iter().map(|l| l.menu_item_id).collect();
    let menu_items = menu_item::find_by_ids(pool, user_id, &ids).await?;
    if let Some(missing) = lines
        .iter()
        .find(|l| !menu_items.iter().any(|m| m.id == l.menu_item_id))
    {
        return Err(RepoError::NotFound(format!(
            "Menu item {} not found",
            missing.menu_item_id
        )));
    }

    // Snapshot line prices at this moment; never recomputed afterwards
    let snapshot: Vec<(i64, i64, f64)> = lines
        .iter()
        .map(|l| {
            let price = menu_items
                .iter()
                .find(|m| m.id == l.menu_item_id)
                .map(|m| m.price)
                .unwrap_or(0.0);
            (l.menu_item_id, l.qty, price)
        })
        .collect();
    let total: f64 = snapshot.iter().map(|(_, qty, price)| price * *qty as f64).sum();

    let sale_id = snowflake_id();
    let now = now_millis();
    let method = payment_method.unwrap_or(PaymentMethod::Pos);

    let mut tx = pool.begin().await?;
    sqlx::query(
        "INSERT INTO sale (id, user_id, total, tax, phone, payment_method, created_at) \
         VALUES (?, ?, ?, 0, ?, ?, ?)",
    )
    .bind(sale_id)
    .bind(user_id)
    .bind(total)
    .bind(&phone)
    .bind(method)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    for (menu_item_id, qty, price) in &snapshot {
        sqlx::query(
            "INSERT INTO sale_item (id, sale_id, menu_item_id, qty, price) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(snowflake_id())
        .bind(sale_id)
        .bind(menu_item_id)
        .bind(qty)
        .bind(price)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    get_with_items(pool, user_id, sale_id).await
}

pub async fn find_owned(pool: &SqlitePool, user_id: i64, id: i64) -> RepoResult<Sale> {
    let sql = format!("{SALE_SELECT} WHERE id = ?");
    let sale = sqlx::query_as::<_, Sale>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Sale {id} not found")))?;
    if sale.user_id != user_id {
        return Err(RepoError::Forbidden("Sale belongs to another account".into()));
    }
    Ok(sale)
}

pub async fn get_with_items(
    pool: &SqlitePool,
    user_id: i64,
    id: i64,
) -> RepoResult<SaleWithItems> {
    let sale = find_owned(pool, user_id, id).await?;
    let items = items_for_sale(pool, id).await?;
    Ok(SaleWithItems { sale, items })
}

pub async fn items_for_sale(pool: &SqlitePool, sale_id: i64) -> RepoResult<Vec<SaleItemDetail>> {
    let sql = format!("{SALE_ITEM_DETAIL_SELECT} WHERE si.sale_id = ? ORDER BY si.id");
    let rows = sqlx::query_as::<_, SaleItemDetail>(&sql)
        .bind(sale_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Latest sales with their lines, newest first.
pub async fn list_recent(
    pool: &SqlitePool,
    user_id: i64,
    limit: i64,
) -> RepoResult<Vec<SaleWithItems>> {
    let sql = format!("{SALE_SELECT} WHERE user_id = ? ORDER BY created_at DESC LIMIT ?");
    let sales = sqlx::query_as::<_, Sale>(&sql)
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

    let mut out = Vec::with_capacity(sales.len());
    for sale in sales {
        let items = items_for_sale(pool, sale.id).await?;
        out.push(SaleWithItems { sale, items });
    }
    Ok(out)
}

/// Sales (with lines) in an optional ms-timestamp range, newest first.
pub async fn list_in_range(
    pool: &SqlitePool,
    user_id: i64,
    start: Option<i64>,
    end: Option<i64>,
) -> RepoResult<Vec<SaleWithItems>> {
    let sql = format!(
        "{SALE_SELECT} WHERE user_id = ?1 \
         AND (?2 IS NULL OR created_at >= ?2) AND (?3 IS NULL OR created_at <= ?3) \
         ORDER BY created_at DESC"
    );
    let sales = sqlx::query_as::<_, Sale>(&sql)
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?;

    let mut out = Vec::with_capacity(sales.len());
    for sale in sales {
        let items = items_for_sale(pool, sale.id).await?;
        out.push(SaleWithItems { sale, items });
    }
    Ok(out)
}

/// Replace the payment method; totals and lines stay untouched.
pub async fn update_payment_method(
    pool: &SqlitePool,
    user_id: i64,
    sale_id: i64,
    method: PaymentMethod,
) -> RepoResult<SaleWithItems> {
    find_owned(pool, user_id, sale_id).await?;
    sqlx::query("UPDATE sale SET payment_method = ? WHERE id = ?")
        .bind(method)
        .bind(sale_id)
        .execute(pool)
        .await?;
    get_with_items(pool, user_id, sale_id).await
}

/// Total revenue and sale count for the dashboard summary
pub async fn totals(pool: &SqlitePool, user_id: i64) -> RepoResult<(f64, i64)> {
    let row: (f64, i64) = sqlx::query_as(
        "SELECT COALESCE(SUM(total), 0.0), COUNT(*) FROM sale WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Best-selling menu items by quantity within an optional range
pub async fn top_menu_items(
    pool: &SqlitePool,
    user_id: i64,
    start: Option<i64>,
    end: Option<i64>,
    limit: i64,
) -> RepoResult<Vec<crate::db::models::sale::TopMenuItem>> {
    let rows = sqlx::query_as(
        "SELECT si.menu_item_id, m.name, SUM(si.qty) AS total_quantity \
         FROM sale_item si \
         JOIN sale s ON si.sale_id = s.id \
         LEFT JOIN menu_item m ON si.menu_item_id = m.id \
         WHERE s.user_id = ?1 AND si.menu_item_id IS NOT NULL \
           AND (?2 IS NULL OR s.created_at >= ?2) AND (?3 IS NULL OR s.created_at <= ?3) \
         GROUP BY si.menu_item_id ORDER BY total_quantity DESC LIMIT ?4",
    )
    .bind(user_id)
    .bind(start)
    .bind(end)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
