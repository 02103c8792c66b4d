//! Menu API 模块 - 租户模式（管理员会话被拒绝）

mod handler;

use axum::{Router, routing::get};

use crate::auth::guard::require_user;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/menu", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        // Fixed segments before /{id} to avoid path conflicts
        .route("/for-sales", get(handler::list_for_sales))
        .route("/categories", get(handler::categories))
        .route("/share", get(handler::share))
        .route(
            "/{id}",
            axum::routing::put(handler::update).delete(handler::delete),
        )
        .route_layer(axum::middleware::from_fn(require_user))
}
