//! Admin API 模块 - 仅管理员角色

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::auth::guard::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/admin", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/users", get(handler::list_users))
        .route("/users/activate", post(handler::activate_user))
        .route("/users/plan", post(handler::update_plan))
        .route("/users/online-menu", post(handler::update_online_menu))
        .route_layer(axum::middleware::from_fn(require_admin))
}
