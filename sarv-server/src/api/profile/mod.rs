//! Profile API 模块 - 租户模式

mod handler;

use axum::{Router, routing::get};

use crate::auth::guard::require_user;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/api/settings/profile",
            get(handler::get_profile).put(handler::update_profile),
        )
        .route_layer(axum::middleware::from_fn(require_user))
}
