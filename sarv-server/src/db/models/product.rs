//! Product (raw material) and Inventory Ledger Models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Ledger reason recorded when a product is created with opening stock
pub const REASON_INITIAL_STOCK: &str = "initial stock";
/// Ledger reason recorded when a stock value is overwritten via update
pub const REASON_MANUAL_CORRECTION: &str = "manual correction";

/// Raw material row
///
/// `stock` is mutable but always reconstructable: it equals the sum of the
/// product's `inventory_log.change` values. Every write path that touches it
/// appends the matching ledger entry in the same transaction.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub price: f64,
    pub stock: i64,
    pub stock_unit: Option<String>,
    pub category: String,
    /// Opaque calendar strings (Persian dates entered as-is)
    pub purchase_date: Option<String>,
    pub expiration_date: Option<String>,
    pub created_at: i64,
}

/// Immutable stock-change record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct InventoryLog {
    pub id: i64,
    pub product_id: i64,
    pub change: i64,
    pub reason: String,
    pub created_at: i64,
}

/// Ledger entry joined with its product (accounting materials report)
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct InventoryLogDetail {
    pub id: i64,
    pub product_id: i64,
    pub change: i64,
    pub reason: String,
    pub created_at: i64,
    pub product_name: String,
    pub product_price: f64,
    pub stock_unit: Option<String>,
}

/// Create payload
#[derive(Debug, Clone, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub price: f64,
    pub stock: Option<i64>,
    pub stock_unit: Option<String>,
    pub category: String,
    pub purchase_date: Option<String>,
    pub expiration_date: Option<String>,
}

/// Update payload. A present `stock` that differs from the current value is
/// logged as a "manual correction" delta; other fields replace silently.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i64>,
    pub stock_unit: Option<String>,
    pub category: Option<String>,
    pub expiration_date: Option<String>,
}
