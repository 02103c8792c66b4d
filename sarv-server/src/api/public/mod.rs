//! Public API 模块 - 免认证的在线菜单

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/public/menu/{slug}", get(handler::shared_menu))
}
