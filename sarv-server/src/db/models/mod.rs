//! Data Models
//!
//! Row types (sqlx `FromRow`) and create/update payloads per table.

pub mod customer;
pub mod menu_item;
pub mod printer;
pub mod product;
pub mod sale;
pub mod user;

pub use customer::{Customer, CustomerCreate};
pub use menu_item::{MenuItem, MenuItemCreate, MenuItemSummary, MenuItemUpdate};
pub use printer::{PrintJob, PrintJobStatus, Printer, PrinterCreate, PrinterWithJobs};
pub use product::{
    InventoryLog, InventoryLogDetail, Product, ProductCreate, ProductUpdate,
    REASON_INITIAL_STOCK, REASON_MANUAL_CORRECTION,
};
pub use sale::{PaymentMethod, Sale, SaleItemDetail, SaleLineInput, SaleWithItems, TopMenuItem};
pub use user::{Role, SubscriptionTier, User, UserCreate, UserProfile, UserProfileUpdate};
