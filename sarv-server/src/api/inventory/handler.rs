//! Inventory API Handlers
//!
//! 所有库存变更路径都经由 product 仓储的成对 (库存, 台账) 事务。

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::auth::SessionPayload;
use crate::core::ServerState;
use crate::db::models::{InventoryLog, Product, ProductCreate, ProductUpdate};
use crate::db::repository::product as product_repo;
use crate::utils::validation::{MAX_NOTE_LEN, validate_required_text};
use crate::utils::{AppResult, validation};

/// GET /api/inventory - 当前租户的全部原料
pub async fn list(
    State(state): State<ServerState>,
    session: SessionPayload,
) -> AppResult<Json<Vec<Product>>> {
    let products = product_repo::find_all(state.pool(), session.user_id).await?;
    Ok(Json(products))
}

/// POST /api/inventory - 新建原料（期初库存记入台账）
pub async fn create(
    State(state): State<ServerState>,
    session: SessionPayload,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<Product>> {
    let product = product_repo::create(state.pool(), session.user_id, payload).await?;
    tracing::info!(product_id = product.id, "Product created");
    Ok(Json(product))
}

/// PUT /api/inventory/{id} - 更新原料
///
/// 带 stock 的补丁会以「manual correction」台账条目记录差额。
pub async fn update(
    State(state): State<ServerState>,
    session: SessionPayload,
    Path(id): Path<i64>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", validation::MAX_NAME_LEN)?;
    }
    let product = product_repo::update(state.pool(), session.user_id, id, payload).await?;
    Ok(Json(product))
}

#[derive(Debug, Deserialize)]
pub struct AdjustStockRequest {
    pub change: i64,
    pub reason: String,
}

/// POST /api/inventory/{id}/adjust - 按差额调整库存并追加台账
pub async fn adjust_stock(
    State(state): State<ServerState>,
    session: SessionPayload,
    Path(id): Path<i64>,
    Json(payload): Json<AdjustStockRequest>,
) -> AppResult<Json<Product>> {
    validate_required_text(&payload.reason, "reason", MAX_NOTE_LEN)?;
    let product = product_repo::adjust_stock(
        state.pool(),
        session.user_id,
        id,
        payload.change,
        payload.reason.trim(),
    )
    .await?;
    tracing::info!(
        product_id = id,
        change = payload.change,
        "Stock adjusted"
    );
    Ok(Json(product))
}

/// DELETE /api/inventory/{id} - 删除原料
///
/// 有销售记录的原料拒绝删除 (409)。
pub async fn delete(
    State(state): State<ServerState>,
    session: SessionPayload,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    product_repo::delete(state.pool(), session.user_id, id).await?;
    tracing::info!(product_id = id, "Product deleted");
    Ok(Json(true))
}

/// GET /api/inventory/{id}/ledger - 原料的台账条目（新到旧）
pub async fn ledger(
    State(state): State<ServerState>,
    session: SessionPayload,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<InventoryLog>>> {
    let entries = product_repo::ledger(state.pool(), session.user_id, id).await?;
    Ok(Json(entries))
}
