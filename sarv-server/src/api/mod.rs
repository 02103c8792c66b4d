//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 注册/登录/登出/当前用户
//! - [`inventory`] - 原料与库存台账接口
//! - [`menu`] - 菜单管理接口
//! - [`sales`] - 销售录入与发票接口
//! - [`printers`] - 打印机与打印任务接口
//! - [`reports`] - 汇总/分析/记账报表接口
//! - [`admin`] - 管理员控制台接口
//! - [`subscription`] - 套餐查询与升级接口
//! - [`profile`] - 店铺资料接口
//! - [`customers`] - 顾客接口
//! - [`public`] - 免认证的在线菜单

pub mod admin;
pub mod auth;
pub mod customers;
pub mod health;
pub mod inventory;
pub mod menu;
pub mod printers;
pub mod profile;
pub mod public;
pub mod reports;
pub mod sales;
pub mod subscription;

use axum::Router;
use axum::middleware as axum_middleware;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::auth::guard;
use crate::core::ServerState;

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        // Public routes
        .merge(health::router())
        .merge(public::router())
        // Account routes
        .merge(auth::router())
        .merge(subscription::router())
        // Tenant routes - plan/user gated per sub-router
        .merge(inventory::router())
        .merge(menu::router())
        .merge(sales::router())
        .merge(printers::router())
        .merge(reports::router())
        .merge(profile::router())
        .merge(customers::router())
        // Admin console - admin role required
        .merge(admin::router())
}

/// Build a fully configured application with all middleware and state
pub fn build_app(state: &ServerState) -> Router {
    build_router()
        // ========== Tower HTTP Middleware ==========
        // CORS - Handle cross-origin requests
        .layer(CorsLayer::permissive())
        // Compression - Gzip compress responses
        .layer(CompressionLayer::new())
        // Trace - Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // Request ID - Generate unique ID for each request
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        // Propagate request ID to response
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        // Session loading - verifies the cookie and injects SessionPayload;
        // per-route guards decide rejection
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            guard::load_session,
        ))
        .with_state(state.clone())
}
