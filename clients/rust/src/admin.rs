use crate::{APIResponse, BaseClient};
use nettu_notifier_api_structs::*;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct AdminClient {
    base: Arc<BaseClient>,
}

impl AdminClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    /// Requires the client to be created with the admin secret code
    pub async fn restart(&self) -> APIResponse<restart_service::APIResponse> {
        self.base
            .post((), "admin/restart".into(), StatusCode::ACCEPTED)
            .await
    }
}
