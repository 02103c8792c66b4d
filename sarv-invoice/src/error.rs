//! Error types for the invoice library

use thiserror::Error;

/// Invoice rendering error types
#[derive(Debug, Error)]
pub enum InvoiceError {
    /// PDF content stream could not be encoded
    #[error("Content encoding failed: {0}")]
    Encoding(String),

    /// IO error while writing the document
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invoice description is not renderable
    #[error("Invalid invoice: {0}")]
    InvalidInvoice(String),
}

/// Result type for invoice operations
pub type InvoiceResult<T> = Result<T, InvoiceError>;
