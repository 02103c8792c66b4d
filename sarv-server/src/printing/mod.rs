//! 打印派发
//!
//! 专业版租户的打印任务经 IPP 网关同步派发一次，随后任务进入终态
//! (SENT 或 FAILED)。派发阻塞的是打印接口自身的响应，绝不阻塞销售建单。

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

/// Dispatch error types
#[derive(Debug, Error)]
pub enum DispatchError {
    /// IPP endpoint not configured for this deployment
    #[error("IPP endpoint is not configured")]
    NotConfigured,

    /// Transport-level failure reaching the gateway
    #[error("IPP request failed: {0}")]
    Transport(String),

    /// Gateway answered with a non-success status
    #[error("IPP gateway rejected the job: {0}")]
    Rejected(String),
}

#[derive(Debug, Serialize)]
struct PrintRequest<'a> {
    printer_id: i64,
    file_url: &'a str,
}

/// IPP 打印派发客户端
#[derive(Clone)]
pub struct PrintDispatcher {
    endpoint: Option<String>,
    client: reqwest::Client,
}

impl PrintDispatcher {
    pub fn new(endpoint: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self { endpoint, client }
    }

    /// Dispatch one job to the gateway. Exactly one attempt; the caller
    /// records the terminal state.
    pub async fn dispatch(&self, printer_id: i64, file_url: &str) -> Result<(), DispatchError> {
        let Some(endpoint) = &self.endpoint else {
            tracing::warn!("IPP endpoint not configured; skipping remote print job");
            return Err(DispatchError::NotConfigured);
        };

        let response = self
            .client
            .post(format!("{endpoint}/print"))
            .json(&PrintRequest {
                printer_id,
                file_url,
            })
            .send()
            .await
            .map_err(|e| DispatchError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DispatchError::Rejected(format!("{status}: {body}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_endpoint_fails_without_network() {
        let dispatcher = PrintDispatcher::new(None);
        let result = dispatcher.dispatch(1, "https://example.com/invoice.pdf").await;
        assert!(matches!(result, Err(DispatchError::NotConfigured)));
    }
}
