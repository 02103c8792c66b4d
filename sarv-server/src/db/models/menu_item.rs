//! Menu Item Model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;

/// Menu item row. `materials` lists referenced raw-material names for
/// informational costing only; there is no hard foreign key.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MenuItem {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub price: f64,
    pub cost: Option<f64>,
    pub category: Option<String>,
    pub materials: Json<Vec<String>>,
    pub created_at: i64,
}

/// Reduced projection for the sale form and the public menu
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MenuItemSummary {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub category: Option<String>,
}

/// Create payload
#[derive(Debug, Clone, Deserialize)]
pub struct MenuItemCreate {
    pub name: String,
    pub price: f64,
    pub cost: Option<f64>,
    pub category: Option<String>,
    pub materials: Option<Vec<String>>,
}

/// Update payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MenuItemUpdate {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub cost: Option<f64>,
    pub category: Option<String>,
    pub materials: Option<Vec<String>>,
}
