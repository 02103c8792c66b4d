//! Printers API 模块
//!
//! 注册/列表/状态对两档套餐开放；IPP 派发仅专业版。

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::auth::guard::{ANY_TIER, PROFESSIONAL_ONLY, require_plan};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    let common = Router::new()
        .route("/", get(handler::list).post(handler::register))
        .route("/status", get(handler::status))
        .route_layer(axum::middleware::from_fn(require_plan(ANY_TIER)));

    let professional = Router::new()
        .route("/job", post(handler::job))
        .route_layer(axum::middleware::from_fn(require_plan(PROFESSIONAL_ONLY)));

    Router::new().nest("/api/printers", common.merge(professional))
}
