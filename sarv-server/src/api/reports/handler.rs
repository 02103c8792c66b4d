//! Report API Handlers
//!
//! 读侧聚合：仓储负责把租户数据取到内存，reporting 模块做纯折叠。

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::auth::SessionPayload;
use crate::core::ServerState;
use crate::db::models::{PaymentMethod, SaleWithItems, TopMenuItem};
use crate::db::repository::{product as product_repo, sale as sale_repo};
use crate::reporting::{self, MaterialsRow, Timeframe, TimeframeReport};
use crate::utils::AppResult;

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub total_revenue: f64,
    pub sale_count: i64,
}

/// GET /api/reports/summary - 仪表盘汇总
pub async fn summary(
    State(state): State<ServerState>,
    session: SessionPayload,
) -> AppResult<Json<SummaryResponse>> {
    let (total_revenue, sale_count) = sale_repo::totals(state.pool(), session.user_id).await?;
    Ok(Json(SummaryResponse {
        total_revenue,
        sale_count,
    }))
}

#[derive(Debug, Deserialize)]
pub struct AccountingQuery {
    /// week | month | six_months | year | all
    pub timeframe: Option<Timeframe>,
    /// 可选的支付方式过滤
    pub payment_method: Option<PaymentMethod>,
}

#[derive(Debug, Serialize)]
pub struct AccountingResponse {
    pub report: TimeframeReport,
    pub materials: Vec<MaterialsRow>,
}

/// GET /api/reports/accounting - 期间分桶的记账报表
pub async fn accounting(
    State(state): State<ServerState>,
    session: SessionPayload,
    Query(query): Query<AccountingQuery>,
) -> AppResult<Json<AccountingResponse>> {
    let timeframe = query.timeframe.unwrap_or(Timeframe::Week);

    let sales = sale_repo::list_in_range(state.pool(), session.user_id, None, None).await?;
    let mut enriched = reporting::enrich(&sales);
    if let Some(method) = query.payment_method {
        enriched.retain(|s| s.payment_method == method);
    }
    let report = reporting::build_report(&enriched, timeframe, Utc::now());

    let logs = product_repo::ledger_for_user(state.pool(), session.user_id).await?;
    let materials = reporting::materials_report(&logs);

    Ok(Json(AccountingResponse { report, materials }))
}

#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    /// 起止时间（UTC 毫秒），缺省为全部历史
    pub start: Option<i64>,
    pub end: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub sales: Vec<SaleWithItems>,
    pub top_items: Vec<TopMenuItem>,
    pub total_revenue: f64,
    pub sale_count: usize,
}

/// GET /api/reports/analytics - 明细分析（仅专业版）
pub async fn analytics(
    State(state): State<ServerState>,
    session: SessionPayload,
    Query(query): Query<AnalyticsQuery>,
) -> AppResult<Json<AnalyticsResponse>> {
    let sales =
        sale_repo::list_in_range(state.pool(), session.user_id, query.start, query.end).await?;
    let top_items =
        sale_repo::top_menu_items(state.pool(), session.user_id, query.start, query.end, 10)
            .await?;

    let total_revenue: f64 = sales.iter().map(|s| s.sale.total).sum();
    let sale_count = sales.len();

    Ok(Json(AnalyticsResponse {
        sales,
        top_items,
        total_revenue,
        sale_count,
    }))
}
