use crate::{APIResponse, BaseClient};
use nettu_notifier_api_structs::*;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct StatusClient {
    base: Arc<BaseClient>,
}

/// Metrics in the plain text exposition format
#[derive(Debug, Clone)]
pub struct Metrics {
    pub content_type: Option<String>,
    pub body: String,
}

impl StatusClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    /// Fails with `UnexpectedStatusCode(503)` when a collaborator is not connected
    pub async fn check_health(&self) -> APIResponse<get_service_health::APIResponse> {
        self.base.get("health".into(), StatusCode::OK).await
    }

    pub async fn get_stats(&self) -> APIResponse<get_service_stats::APIResponse> {
        self.base.get("status".into(), StatusCode::OK).await
    }

    pub async fn get_metrics(&self) -> APIResponse<Metrics> {
        let (content_type, body) = self.base.get_text("metrics".into(), StatusCode::OK).await?;
        Ok(Metrics { content_type, body })
    }
}
