//! Inventory API 模块 - 两档套餐均可用

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::auth::guard::{ANY_TIER, require_plan};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/inventory", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            axum::routing::put(handler::update).delete(handler::delete),
        )
        .route("/{id}/adjust", post(handler::adjust_stock))
        .route("/{id}/ledger", get(handler::ledger))
        .route_layer(axum::middleware::from_fn(require_plan(ANY_TIER)))
}
