//! Customer Handlers

use axum::{Json, extract::State};

use crate::auth::SessionPayload;
use crate::core::ServerState;
use crate::db::models::{Customer, CustomerCreate};
use crate::db::repository::customer as customer_repo;
use crate::utils::{AppResult, phone::normalize_phone};

/// GET /api/customers - 顾客列表（新到旧）
pub async fn list(
    State(state): State<ServerState>,
    session: SessionPayload,
) -> AppResult<Json<Vec<Customer>>> {
    let customers = customer_repo::find_all(state.pool(), session.user_id).await?;
    Ok(Json(customers))
}

/// POST /api/customers - 新建顾客（手机号规范化失败则不保存号码）
pub async fn create(
    State(state): State<ServerState>,
    session: SessionPayload,
    Json(mut payload): Json<CustomerCreate>,
) -> AppResult<Json<Customer>> {
    payload.phone = payload.phone.as_deref().and_then(normalize_phone);
    let customer = customer_repo::create(state.pool(), session.user_id, payload).await?;
    Ok(Json(customer))
}
