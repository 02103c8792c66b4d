//! Sales API Handlers
//!
//! 建单把表头与行项作为一个事务落库；发票 PDF 是尽力而为的副作用，
//! 失败只体现为 `invoice_path: null`，销售本身照常成功。

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use crate::auth::SessionPayload;
use crate::core::ServerState;
use crate::db::models::{PaymentMethod, SaleLineInput, SaleWithItems};
use crate::db::repository::{sale as sale_repo, user as user_repo};
use crate::services::invoice::generate_invoice_file;
use crate::utils::{AppResult, phone::normalize_phone};

/// 列表端点一次返回的最大销售数
const RECENT_SALES_LIMIT: i64 = 20;

#[derive(Debug, Deserialize)]
pub struct CreateSaleRequest {
    pub items: Vec<SaleLineInput>,
    pub phone: Option<String>,
    pub payment_method: Option<PaymentMethod>,
}

#[derive(Debug, Serialize)]
pub struct CreateSaleResponse {
    #[serde(flatten)]
    pub sale: SaleWithItems,
    /// 发票文件路径；生成失败时为 null（销售仍算成功）
    pub invoice_path: Option<String>,
}

/// POST /api/sales - 录入销售
///
/// 行价快照自菜单当前价格；无效的顾客手机号静默丢弃而非报错。
pub async fn create(
    State(state): State<ServerState>,
    session: SessionPayload,
    Json(req): Json<CreateSaleRequest>,
) -> AppResult<Json<CreateSaleResponse>> {
    // Invalid phone is dropped, not rejected
    let phone = req.phone.as_deref().and_then(normalize_phone);

    let sale = sale_repo::create(
        state.pool(),
        session.user_id,
        &req.items,
        phone,
        req.payment_method,
    )
    .await?;

    tracing::info!(
        sale_id = sale.sale.id,
        total = sale.sale.total,
        items = sale.items.len(),
        "Sale recorded"
    );

    let cafe_name = user_repo::profile(state.pool(), session.user_id)
        .await
        .ok()
        .flatten()
        .map(|p| p.name)
        .unwrap_or_else(|| "Sarv".to_string());
    let invoice_path =
        generate_invoice_file(&state.config.invoices_dir(), &sale, &cafe_name).await;

    Ok(Json(CreateSaleResponse { sale, invoice_path }))
}

/// GET /api/sales - 最近 20 笔销售（含行项）
pub async fn list(
    State(state): State<ServerState>,
    session: SessionPayload,
) -> AppResult<Json<Vec<SaleWithItems>>> {
    let sales = sale_repo::list_recent(state.pool(), session.user_id, RECENT_SALES_LIMIT).await?;
    Ok(Json(sales))
}

/// GET /api/sales/{id} - 单笔销售
pub async fn get_by_id(
    State(state): State<ServerState>,
    session: SessionPayload,
    Path(id): Path<i64>,
) -> AppResult<Json<SaleWithItems>> {
    let sale = sale_repo::get_with_items(state.pool(), session.user_id, id).await?;
    Ok(Json(sale))
}

#[derive(Debug, Deserialize)]
pub struct UpdatePaymentMethodRequest {
    pub payment_method: PaymentMethod,
}

/// PATCH /api/sales/{id}/payment-method - 改支付方式
///
/// 只替换字段，总额与行项不重算；未知取值在反序列化阶段即被拒绝。
pub async fn update_payment_method(
    State(state): State<ServerState>,
    session: SessionPayload,
    Path(id): Path<i64>,
    Json(req): Json<UpdatePaymentMethodRequest>,
) -> AppResult<Json<SaleWithItems>> {
    let sale =
        sale_repo::update_payment_method(state.pool(), session.user_id, id, req.payment_method)
            .await?;
    Ok(Json(sale))
}

#[derive(Debug, Serialize)]
pub struct InvoiceResponse {
    pub sale_id: i64,
    pub invoice_path: Option<String>,
}

/// GET /api/sales/{id}/invoice - 按需（重）生成发票
pub async fn invoice(
    State(state): State<ServerState>,
    session: SessionPayload,
    Path(id): Path<i64>,
) -> AppResult<Json<InvoiceResponse>> {
    let sale = sale_repo::get_with_items(state.pool(), session.user_id, id).await?;
    let cafe_name = user_repo::profile(state.pool(), session.user_id)
        .await
        .ok()
        .flatten()
        .map(|p| p.name)
        .unwrap_or_else(|| "Sarv".to_string());
    let invoice_path =
        generate_invoice_file(&state.config.invoices_dir(), &sale, &cafe_name).await;
    Ok(Json(InvoiceResponse {
        sale_id: id,
        invoice_path,
    }))
}
