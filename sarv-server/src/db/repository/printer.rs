//! Printer and Print Job Repository

use super::{RepoError, RepoResult};
use crate::db::models::{
    PrintJob, PrintJobStatus, Printer, PrinterWithJobs, SubscriptionTier,
};
use crate::utils::{now_millis, snowflake_id};
use sqlx::SqlitePool;

const PRINTER_SELECT: &str =
    "SELECT id, user_id, name, address, created_at FROM printer";
const JOB_SELECT: &str =
    "SELECT id, printer_id, file_url, status, created_at, updated_at FROM print_job";

/// Register a printer. The BASIC tier is limited to a single device.
pub async fn register(
    pool: &SqlitePool,
    user_id: i64,
    tier: SubscriptionTier,
    name: &str,
    address: &str,
) -> RepoResult<Printer> {
    if name.trim().is_empty() || address.trim().is_empty() {
        return Err(RepoError::Validation("name and address are required".into()));
    }

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM printer WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await?;
    if tier == SubscriptionTier::Basic && count >= 1 {
        return Err(RepoError::Validation(
            "Basic plan allows only one printer".into(),
        ));
    }

    let id = snowflake_id();
    sqlx::query("INSERT INTO printer (id, user_id, name, address, created_at) VALUES (?, ?, ?, ?, ?)")
        .bind(id)
        .bind(user_id)
        .bind(name.trim())
        .bind(address.trim())
        .bind(now_millis())
        .execute(pool)
        .await?;

    find_owned(pool, user_id, id).await
}

pub async fn find_owned(pool: &SqlitePool, user_id: i64, id: i64) -> RepoResult<Printer> {
    let sql = format!("{PRINTER_SELECT} WHERE id = ?");
    let printer = sqlx::query_as::<_, Printer>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Printer {id} not found")))?;
    if printer.user_id != user_id {
        return Err(RepoError::Forbidden(
            "Printer belongs to another account".into(),
        ));
    }
    Ok(printer)
}

/// Printers with their 5 most recent jobs each, newest printer first
pub async fn list_with_jobs(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<PrinterWithJobs>> {
    let sql = format!("{PRINTER_SELECT} WHERE user_id = ? ORDER BY created_at DESC");
    let printers = sqlx::query_as::<_, Printer>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;

    let mut out = Vec::with_capacity(printers.len());
    for printer in printers {
        let jobs_sql =
            format!("{JOB_SELECT} WHERE printer_id = ? ORDER BY created_at DESC LIMIT 5");
        let jobs = sqlx::query_as::<_, PrintJob>(&jobs_sql)
            .bind(printer.id)
            .fetch_all(pool)
            .await?;
        out.push(PrinterWithJobs { printer, jobs });
    }
    Ok(out)
}

/// Create a job in the initial PENDING state
pub async fn create_job(pool: &SqlitePool, printer_id: i64, file_url: &str) -> RepoResult<PrintJob> {
    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO print_job (id, printer_id, file_url, status, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(printer_id)
    .bind(file_url)
    .bind(PrintJobStatus::Pending)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    find_job(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create print job".into()))
}

pub async fn find_job(pool: &SqlitePool, id: i64) -> RepoResult<Option<PrintJob>> {
    let sql = format!("{JOB_SELECT} WHERE id = ?");
    let job = sqlx::query_as::<_, PrintJob>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(job)
}

/// Move a PENDING job into its terminal state after the dispatch attempt.
/// Already-terminal jobs are left untouched.
pub async fn finish_job(
    pool: &SqlitePool,
    job_id: i64,
    status: PrintJobStatus,
) -> RepoResult<PrintJob> {
    if status == PrintJobStatus::Pending {
        return Err(RepoError::Validation(
            "a job cannot transition back to PENDING".into(),
        ));
    }
    let rows = sqlx::query("UPDATE print_job SET status = ?, updated_at = ? WHERE id = ? AND status = ?")
        .bind(status)
        .bind(now_millis())
        .bind(job_id)
        .bind(PrintJobStatus::Pending)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::Conflict(format!(
            "Print job {job_id} is not pending"
        )));
    }
    find_job(pool, job_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Print job {job_id} not found")))
}

/// The 10 most recent jobs across all of the tenant's printers
pub async fn recent_jobs(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<PrintJob>> {
    let rows = sqlx::query_as::<_, PrintJob>(
        "SELECT j.id, j.printer_id, j.file_url, j.status, j.created_at, j.updated_at \
         FROM print_job j JOIN printer p ON j.printer_id = p.id \
         WHERE p.user_id = ? ORDER BY j.created_at DESC LIMIT 10",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
