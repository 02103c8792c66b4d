//! Customers API 模块 - 两档套餐均可用

mod handler;

use axum::{Router, routing::get};

use crate::auth::guard::{ANY_TIER, require_plan};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/api/customers",
            get(handler::list).post(handler::create),
        )
        .route_layer(axum::middleware::from_fn(require_plan(ANY_TIER)))
}
