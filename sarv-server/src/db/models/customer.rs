//! Customer Model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Loyalty customer, read-mostly
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Customer {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub loyalty_points: i64,
    pub created_at: i64,
}

/// Create payload
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerCreate {
    pub name: String,
    pub phone: Option<String>,
}
