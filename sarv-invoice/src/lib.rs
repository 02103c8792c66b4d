//! # sarv-invoice
//!
//! Invoice PDF rendering library - document assembly only.
//!
//! ## Scope
//!
//! This crate handles HOW to render an invoice:
//! - PDF object/page assembly (lopdf)
//! - Text layout for header, line items and total
//!
//! Business logic (WHAT goes on the invoice) stays in application code:
//! - Sale recording and price snapshots → sarv-server
//! - File placement and retention → sarv-server
//!
//! ## Example
//!
//! ```ignore
//! use sarv_invoice::{Invoice, InvoiceLine, render_invoice};
//!
//! let invoice = Invoice {
//!     invoice_id: 42,
//!     cafe_name: "Sarv".to_string(),
//!     lines: vec![InvoiceLine { name: "Espresso".into(), quantity: 2, price: 50000.0 }],
//!     total: 100000.0,
//!     phone: None,
//! };
//! let bytes = render_invoice(&invoice)?;
//! std::fs::write("invoice.pdf", bytes)?;
//! ```

mod error;
mod render;

// Re-exports
pub use error::{InvoiceError, InvoiceResult};
pub use render::{Invoice, InvoiceLine, render_invoice};
