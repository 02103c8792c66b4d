//! Sale and Sale Item Models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Payment method accepted at the register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    CardToCard,
    Pos,
}

/// Sale header
///
/// `total` equals the sum over items of `qty * price` with each `price`
/// frozen at creation time; later menu price edits never touch it.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Sale {
    pub id: i64,
    pub user_id: i64,
    pub total: f64,
    pub tax: f64,
    pub phone: Option<String>,
    pub payment_method: PaymentMethod,
    pub created_at: i64,
}

/// Sale line joined with its source names and costing inputs.
///
/// `menu_cost` / `product_price` feed the reporting cost fallback
/// (menu cost, else raw-material price, else zero).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SaleItemDetail {
    pub id: i64,
    pub sale_id: i64,
    pub menu_item_id: Option<i64>,
    pub product_id: Option<i64>,
    pub qty: i64,
    pub price: f64,
    pub name: Option<String>,
    pub menu_cost: Option<f64>,
    pub product_price: Option<f64>,
}

/// Sale plus its lines, the shape handed back by the API
#[derive(Debug, Clone, Serialize)]
pub struct SaleWithItems {
    #[serde(flatten)]
    pub sale: Sale,
    pub items: Vec<SaleItemDetail>,
}

/// One requested line on sale creation
#[derive(Debug, Clone, Deserialize)]
pub struct SaleLineInput {
    pub menu_item_id: i64,
    pub qty: i64,
}

/// Best-seller aggregation row
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TopMenuItem {
    pub menu_item_id: i64,
    pub name: Option<String>,
    pub total_quantity: i64,
}
