//! Reports API 模块
//!
//! 汇总与记账对两档套餐开放；明细分析仅专业版。

mod handler;

use axum::{Router, routing::get};

use crate::auth::guard::{ANY_TIER, PROFESSIONAL_ONLY, require_plan};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    let common = Router::new()
        .route("/summary", get(handler::summary))
        .route("/accounting", get(handler::accounting))
        .route_layer(axum::middleware::from_fn(require_plan(ANY_TIER)));

    let professional = Router::new()
        .route("/analytics", get(handler::analytics))
        .route_layer(axum::middleware::from_fn(require_plan(PROFESSIONAL_ONLY)));

    Router::new().nest("/api/reports", common.merge(professional))
}
