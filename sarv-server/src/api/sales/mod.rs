//! Sales API 模块 - 两档套餐均可用

mod handler;

use axum::{
    Router,
    routing::{get, patch},
};

use crate::auth::guard::{ANY_TIER, require_plan};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/sales", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/payment-method", patch(handler::update_payment_method))
        .route("/{id}/invoice", get(handler::invoice))
        .route_layer(axum::middleware::from_fn(require_plan(ANY_TIER)))
}
