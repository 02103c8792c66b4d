//! Printer and Print Job Models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Print job lifecycle. PENDING is the only non-terminal state; a job moves
/// to SENT or FAILED after exactly one dispatch attempt and never changes
/// again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum PrintJobStatus {
    Pending,
    Sent,
    Failed,
}

/// Registered printer
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Printer {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub address: String,
    pub created_at: i64,
}

/// Queued/dispatched print job
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PrintJob {
    pub id: i64,
    pub printer_id: i64,
    pub file_url: String,
    pub status: PrintJobStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Printer with its most recent jobs (list endpoint shape)
#[derive(Debug, Clone, Serialize)]
pub struct PrinterWithJobs {
    #[serde(flatten)]
    pub printer: Printer,
    pub jobs: Vec<PrintJob>,
}

/// Registration payload
#[derive(Debug, Clone, Deserialize)]
pub struct PrinterCreate {
    pub name: String,
    pub address: String,
}
