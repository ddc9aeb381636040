use crate::{APIResponse, BaseClient};
use nettu_notifier_api_structs::*;
use reqwest::StatusCode;
use serde_json::{Map, Value};
use std::sync::Arc;

#[derive(Clone)]
pub struct SettingsClient {
    base: Arc<BaseClient>,
}

impl SettingsClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn get(&self, owner_id: &str) -> APIResponse<get_settings::APIResponse> {
        self.base
            .get(format!("settings/{}", owner_id), StatusCode::OK)
            .await
    }

    pub async fn update(
        &self,
        owner_id: &str,
        settings: Map<String, Value>,
    ) -> APIResponse<update_settings::APIResponse> {
        let body = update_settings::RequestBody { settings };
        self.base
            .put(body, format!("settings/{}", owner_id), StatusCode::OK)
            .await
    }
}
