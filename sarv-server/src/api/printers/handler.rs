//! Printer API Handlers

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::auth::SessionPayload;
use crate::core::ServerState;
use crate::db::models::{PrintJob, PrintJobStatus, Printer, PrinterCreate, PrinterWithJobs};
use crate::db::repository::printer as printer_repo;
use crate::printing::PrintDispatcher;
use crate::utils::validation::{MAX_URL_LEN, validate_required_text};
use crate::utils::AppResult;

/// POST /api/printers - 注册打印机（BASIC 限 1 台）
pub async fn register(
    State(state): State<ServerState>,
    session: SessionPayload,
    Json(payload): Json<PrinterCreate>,
) -> AppResult<Json<Printer>> {
    let printer = printer_repo::register(
        state.pool(),
        session.user_id,
        session.tier,
        &payload.name,
        &payload.address,
    )
    .await?;
    tracing::info!(printer_id = printer.id, "Printer registered");
    Ok(Json(printer))
}

/// GET /api/printers - 打印机及其最近 5 个任务
pub async fn list(
    State(state): State<ServerState>,
    session: SessionPayload,
) -> AppResult<Json<Vec<PrinterWithJobs>>> {
    let printers = printer_repo::list_with_jobs(state.pool(), session.user_id).await?;
    Ok(Json(printers))
}

#[derive(Debug, Deserialize)]
pub struct PrintJobRequest {
    pub printer_id: i64,
    pub file_url: String,
}

#[derive(Debug, Serialize)]
pub struct PrintJobResponse {
    pub job_id: i64,
    pub status: PrintJobStatus,
    /// 派发失败时的领域级原因
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// POST /api/printers/job - 建任务并同步派发一次
///
/// 任务先以 PENDING 落库，派发一次后进入终态。派发失败不作为请求失败，
/// 失败原因作为响应元数据返回。
pub async fn job(
    State(state): State<ServerState>,
    session: SessionPayload,
    Json(req): Json<PrintJobRequest>,
) -> AppResult<Json<PrintJobResponse>> {
    validate_required_text(&req.file_url, "file_url", MAX_URL_LEN)?;

    // Ownership check before anything is queued
    printer_repo::find_owned(state.pool(), session.user_id, req.printer_id).await?;

    let job = printer_repo::create_job(state.pool(), req.printer_id, &req.file_url).await?;

    let dispatcher = PrintDispatcher::new(state.config.ipp_endpoint.clone());
    let (status, reason) = match dispatcher.dispatch(req.printer_id, &req.file_url).await {
        Ok(()) => (PrintJobStatus::Sent, None),
        Err(e) => {
            tracing::warn!(job_id = job.id, error = %e, "Print dispatch failed");
            (PrintJobStatus::Failed, Some(e.to_string()))
        }
    };
    let job = printer_repo::finish_job(state.pool(), job.id, status).await?;

    Ok(Json(PrintJobResponse {
        job_id: job.id,
        status: job.status,
        reason,
    }))
}

/// GET /api/printers/status - 租户全部打印机的最近 10 个任务
pub async fn status(
    State(state): State<ServerState>,
    session: SessionPayload,
) -> AppResult<Json<Vec<PrintJob>>> {
    let jobs = printer_repo::recent_jobs(state.pool(), session.user_id).await?;
    Ok(Json(jobs))
}
